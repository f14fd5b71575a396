use std::io::{self, Read};

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Refillable read buffer backing the streaming parser.
///
/// Grows when a whole record does not fit, so the parser never has to
/// handle records split across refills.
pub struct BufferedReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    cap: usize,
    eof: bool,
}

impl<R: Read> BufferedReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        BufferedReader {
            reader,
            buffer: vec![0; capacity.max(1)],
            pos: 0,
            cap: 0,
            eof: false,
        }
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.cap - self.pos
    }

    #[inline]
    pub fn consumed(&self) -> &[u8] {
        &self.buffer[self.pos..self.cap]
    }

    #[inline]
    pub fn consume(&mut self, amt: usize) {
        self.pos = std::cmp::min(self.pos + amt, self.cap);
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn fill_buffer(&mut self) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }

        if self.pos > 0 {
            self.buffer.copy_within(self.pos..self.cap, 0);
            self.cap -= self.pos;
            self.pos = 0;
        }

        if self.cap == self.buffer.len() {
            self.buffer.resize(self.buffer.len() * 2, 0);
        }

        let bytes_read = self.reader.read(&mut self.buffer[self.cap..])?;
        if bytes_read == 0 {
            self.eof = true;
        }
        self.cap += bytes_read;
        Ok(bytes_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_when_full() {
        let data = vec![b'x'; 64];
        let mut reader = BufferedReader::with_capacity(8, &data[..]);
        while !reader.is_eof() {
            reader.fill_buffer().unwrap();
        }
        assert_eq!(reader.available(), 64);
        assert_eq!(reader.consumed(), &data[..]);
    }

    #[test]
    fn consume_advances_window() {
        let data = b"abcdef";
        let mut reader = BufferedReader::new(&data[..]);
        reader.fill_buffer().unwrap();
        reader.consume(3);
        assert_eq!(reader.consumed(), b"def");
    }
}
