use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("character '{}' (0x{byte:02x}) outside of valid phred range ('{}' to '~')",
            *.byte as char, *.offset as char)]
    OutOfRange { byte: u8, offset: u8 },

    #[error("record '{record}' has no quality data")]
    MissingQuality { record: String },

    #[error("cannot compute {statistic} of an empty quality string")]
    EmptyInput { statistic: &'static str },

    #[error("unable to find median, this is an error in the code, please contact the developers")]
    InternalConsistency,

    #[error("invalid header: expected '@' or '>' at line {line}")]
    InvalidHeader { line: usize },

    #[error("invalid separator: expected '+' at line {line}")]
    InvalidSeparator { line: usize },

    #[error("sequence and quality lengths don't match (seq: {seq_len}, qual: {qual_len})")]
    LengthMismatch { seq_len: usize, qual_len: usize },

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("records are out of sync, names {names} do not match")]
    GroupOutOfSync { names: String },

    #[error("input files have an unequal number of records")]
    UnequalRecordCounts,

    #[error("number of inputs and outputs should be equal (inputs: {inputs}, outputs: {outputs})")]
    InputOutputMismatch { inputs: usize, outputs: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;
