use crate::error::{FilterError, Result};
use crate::record::{OwnedRecord, Record};
use memchr::memchr;
use std::io::Read;

/// Single-pass parser over a resident byte buffer.
///
/// Recognizes 4-line FASTQ records and FASTA records without quality
/// data. FASTA sequences must fit on one line, which holds for
/// sequencing reads; wrapped reference-style FASTA is rejected.
pub struct Parser<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) pos: usize,
    pub(crate) line: usize,
}

impl<'a> Parser<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Parser {
            data,
            pos: 0,
            line: 1,
        }
    }

    #[inline]
    pub(crate) fn resume(data: &'a [u8], pos: usize, line: usize) -> Self {
        Parser { data, pos, line }
    }

    #[inline]
    fn read_line(&mut self) -> Result<&'a [u8]> {
        if self.pos >= self.data.len() {
            return Err(FilterError::UnexpectedEof);
        }
        let start = self.pos;
        let mut end = match memchr(b'\n', &self.data[start..]) {
            Some(offset) => {
                self.pos = start + offset + 1;
                start + offset
            }
            None => {
                self.pos = self.data.len();
                self.data.len()
            }
        };
        self.line += 1;
        if end > start && self.data[end - 1] == b'\r' {
            end -= 1;
        }
        Ok(&self.data[start..end])
    }

    fn skip_blank(&mut self) {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            if self.data[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    pub fn parse_record(&mut self) -> Result<Option<Record<'a>>> {
        self.skip_blank();
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        match self.data[self.pos] {
            b'@' => self.parse_fastq(),
            b'>' => self.parse_fasta(),
            _ => Err(FilterError::InvalidHeader { line: self.line }),
        }
    }

    fn parse_fastq(&mut self) -> Result<Option<Record<'a>>> {
        let header = self.read_line()?;
        let (id, desc) = split_header(&header[1..]);

        let seq = self.read_line()?;

        let separator = self.read_line()?;
        if separator.is_empty() || separator[0] != b'+' {
            return Err(FilterError::InvalidSeparator { line: self.line - 1 });
        }

        let qual = self.read_line()?;
        if seq.len() != qual.len() {
            return Err(FilterError::LengthMismatch {
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }

        Ok(Some(Record::new(id, desc, seq, Some(qual))))
    }

    fn parse_fasta(&mut self) -> Result<Option<Record<'a>>> {
        let header = self.read_line()?;
        let (id, desc) = split_header(&header[1..]);

        let seq = self.read_line()?;

        // The next non-blank line must start a new record.
        let checkpoint = (self.pos, self.line);
        self.skip_blank();
        if self.pos < self.data.len() && !matches!(self.data[self.pos], b'>' | b'@') {
            return Err(FilterError::InvalidHeader { line: self.line });
        }
        (self.pos, self.line) = checkpoint;

        Ok(Some(Record::new(id, desc, seq, None)))
    }
}

#[inline]
fn split_header(header: &[u8]) -> (&[u8], Option<&[u8]>) {
    match memchr(b' ', header).or_else(|| memchr(b'\t', header)) {
        Some(pos) => (&header[..pos], Some(&header[pos + 1..])),
        None => (header, None),
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_record().transpose()
    }
}

/// Parser over any `Read` source, used for gzip streams and stdin.
///
/// A record is only taken from the middle of the buffer, or at true
/// end of input; a parse that consumes the whole buffer while more
/// input remains is retried after refilling, so records never get
/// truncated at buffer boundaries.
pub struct StreamingParser<R: Read> {
    reader: crate::buffer::BufferedReader<R>,
}

impl<R: Read> StreamingParser<R> {
    pub fn new(reader: R) -> Self {
        StreamingParser {
            reader: crate::buffer::BufferedReader::new(reader),
        }
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        StreamingParser {
            reader: crate::buffer::BufferedReader::with_capacity(capacity, reader),
        }
    }

    pub fn parse_next(&mut self) -> Result<Option<OwnedRecord>> {
        loop {
            let at_eof = self.reader.is_eof();
            let buffer = self.reader.consumed();
            if buffer.is_empty() {
                if at_eof {
                    return Ok(None);
                }
                self.reader.fill_buffer()?;
                continue;
            }

            let mut parser = Parser::new(buffer);
            match parser.parse_record() {
                Ok(Some(record)) if at_eof || parser.pos < buffer.len() => {
                    let owned = OwnedRecord::from_record(&record);
                    let consumed = parser.pos;
                    self.reader.consume(consumed);
                    return Ok(Some(owned));
                }
                Ok(None) if at_eof => return Ok(None),
                Err(e) if at_eof => return Err(e),
                // Truncation-ambiguous outcomes: the record may have been
                // cut off at the buffer end, so refill and retry.
                Err(FilterError::UnexpectedEof) => {
                    self.reader.fill_buffer()?;
                }
                Err(FilterError::LengthMismatch { .. }) if parser.pos == buffer.len() => {
                    self.reader.fill_buffer()?;
                }
                // Any other error with input left in the buffer is a real
                // format error; report it without buffering further.
                Err(e) => return Err(e),
                // Ok(Some) that consumed the whole buffer, or a buffer
                // holding only whitespace.
                _ => {
                    self.reader.fill_buffer()?;
                }
            }
        }
    }
}

impl<R: Read> Iterator for StreamingParser<R> {
    type Item = Result<OwnedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_next().transpose()
    }
}
