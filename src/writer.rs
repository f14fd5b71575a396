use crate::error::Result;
use crate::record::{OwnedRecord, Record};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes records in the format they carry: 4-line FASTQ when quality
/// data is present, 2-line FASTA otherwise. Output is gzip-compressed
/// when the target path ends in `.gz`.
pub enum FastxWriter<W: Write> {
    Plain(BufWriter<W>),
    Gzip(GzEncoder<BufWriter<W>>),
}

impl FastxWriter<Box<dyn Write + Send>> {
    /// Opens `path` for writing, `-` meaning stdout.
    pub fn create<P: AsRef<Path>>(path: P, compression: Compression) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str() == "-" {
            return Ok(Self::new(Box::new(io::stdout())));
        }
        let file: Box<dyn Write + Send> = Box::new(File::create(path)?);
        if path.extension().and_then(|s| s.to_str()) == Some("gz") {
            Ok(Self::new_gzip(file, compression))
        } else {
            Ok(Self::new(file))
        }
    }
}

impl<W: Write> FastxWriter<W> {
    pub fn new(writer: W) -> Self {
        FastxWriter::Plain(BufWriter::new(writer))
    }

    pub fn new_gzip(writer: W, compression: Compression) -> Self {
        FastxWriter::Gzip(GzEncoder::new(BufWriter::new(writer), compression))
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let writer: &mut dyn Write = match self {
            FastxWriter::Plain(w) => w,
            FastxWriter::Gzip(w) => w,
        };

        writer.write_all(if record.qual.is_some() { b"@" } else { b">" })?;
        writer.write_all(record.id())?;
        if let Some(desc) = record.desc() {
            writer.write_all(b" ")?;
            writer.write_all(desc)?;
        }
        writer.write_all(b"\n")?;
        writer.write_all(record.seq())?;
        writer.write_all(b"\n")?;
        if let Some(qual) = record.qual() {
            writer.write_all(b"+\n")?;
            writer.write_all(qual)?;
            writer.write_all(b"\n")?;
        }

        Ok(())
    }

    pub fn write_owned_record(&mut self, record: &OwnedRecord) -> Result<()> {
        self.write_record(&record.as_record())
    }

    pub fn finish(&mut self) -> Result<()> {
        match self {
            FastxWriter::Plain(w) => w.flush()?,
            FastxWriter::Gzip(w) => {
                w.try_finish()?;
                w.get_mut().flush()?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Drop for FastxWriter<W> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_fastq_and_fasta_records() {
        let mut buffer = Vec::new();
        let mut writer = FastxWriter::new(&mut buffer);
        writer
            .write_record(&Record::new(b"r1", None, b"ACGT", Some(b"IIII")))
            .unwrap();
        writer
            .write_record(&Record::new(b"r2", Some(b"desc"), b"TGCA", None))
            .unwrap();
        writer.finish().unwrap();
        drop(writer);
        assert_eq!(buffer, b"@r1\nACGT\n+\nIIII\n>r2 desc\nTGCA\n");
    }
}
