use crate::error::Result;
use crate::parser::{Parser, StreamingParser};
use crate::record::{OwnedRecord, Record};
use flate2::read::MultiGzDecoder;
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads FASTQ or FASTA records from a file, a gzip-compressed file, or
/// any byte stream. Plain files are memory-mapped; compressed files and
/// stdin go through the streaming parser.
pub enum FastxReader {
    Mmap(MmapReader),
    Streaming(Box<dyn Iterator<Item = Result<OwnedRecord>> + Send>),
}

impl FastxReader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            Self::from_gzip_file(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(FastxReader::Mmap(MmapReader::new(mmap)))
    }

    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let decoder = MultiGzDecoder::new(BufReader::new(file));
        Ok(Self::from_reader(decoder))
    }

    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        FastxReader::Streaming(Box::new(StreamingParser::new(reader)))
    }

    /// Borrowed iteration over a memory-mapped file. Streaming sources
    /// cannot hand out borrows into their refillable buffer.
    pub fn records(&self) -> Option<impl Iterator<Item = Result<Record<'_>>> + '_> {
        match self {
            FastxReader::Mmap(reader) => Some(reader.records()),
            FastxReader::Streaming(_) => None,
        }
    }

    pub fn into_records(self) -> Box<dyn Iterator<Item = Result<OwnedRecord>> + Send> {
        match self {
            FastxReader::Mmap(reader) => Box::new(reader.into_records()),
            FastxReader::Streaming(iter) => iter,
        }
    }
}

pub struct MmapReader {
    mmap: Mmap,
}

impl MmapReader {
    pub fn new(mmap: Mmap) -> Self {
        MmapReader { mmap }
    }

    pub fn records(&self) -> impl Iterator<Item = Result<Record<'_>>> + '_ {
        Parser::new(&self.mmap)
    }

    pub fn into_records(self) -> impl Iterator<Item = Result<OwnedRecord>> {
        OwnedRecordIterator {
            mmap: self.mmap,
            pos: 0,
            line: 1,
            failed: false,
        }
    }
}

/// Owns the mapping and re-anchors a parser at the saved position for
/// each record, so no self-referential borrow is needed.
struct OwnedRecordIterator {
    mmap: Mmap,
    pos: usize,
    line: usize,
    failed: bool,
}

impl Iterator for OwnedRecordIterator {
    type Item = Result<OwnedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut parser = Parser::resume(&self.mmap, self.pos, self.line);
        let item = parser.parse_record();
        self.pos = parser.pos;
        self.line = parser.line;
        match item {
            Ok(Some(record)) => Some(Ok(OwnedRecord::from_record(&record))),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
