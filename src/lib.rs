pub mod buffer;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod qual;
pub mod reader;
pub mod record;
pub mod sync;
pub mod writer;

pub use error::{FilterError, Result};
pub use filter::{
    AverageErrorRateFilter, FilterChain, FilterReport, GroupFilter, MaxLengthFilter,
    MedianQualityFilter, MinLengthFilter, Threshold,
};
pub use parser::{Parser, StreamingParser};
pub use pipeline::{filter_fastq, RunSummary, DEFAULT_COMPRESSION_LEVEL};
pub use qual::{
    average_error_rate, qualmean, qualmedian, sum_error_rate, PhredHistogram,
    DEFAULT_PHRED_OFFSET, MAX_PHRED,
};
pub use reader::FastxReader;
pub use record::{OwnedRecord, Record};
pub use sync::SyncedReader;
pub use writer::FastxWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_a_parsed_record() {
        let data = b"@SEQ_ID\nGATTTGGGGTTCAAAGCAGTATCGATCAAATAGTAAATCCATTTGTTCAACTCACAGTTT\n+\n!''*((((***+))%%%++)(%%%%).1***-+*''))**55CCF>>>>>>CCCCCCC65\n";
        let record = Parser::new(data).next().unwrap().unwrap();
        let mut chain = FilterChain::new()
            .with(Box::new(MinLengthFilter::new(10)))
            .with(Box::new(MedianQualityFilter::new(30.0)));
        // Median quality of this read is well below 30.
        assert!(!chain.evaluate(&[record]).unwrap());
    }
}
