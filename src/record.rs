/// A sequencing read borrowed from an input buffer.
///
/// `qual` is `None` for FASTA-style records, which carry no quality data.
/// Quality filters report an error when handed such a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub id: &'a [u8],
    pub desc: Option<&'a [u8]>,
    pub seq: &'a [u8],
    pub qual: Option<&'a [u8]>,
}

impl<'a> Record<'a> {
    #[inline]
    pub fn new(id: &'a [u8], desc: Option<&'a [u8]>, seq: &'a [u8], qual: Option<&'a [u8]>) -> Self {
        Record { id, desc, seq, qual }
    }

    #[inline]
    pub fn id(&self) -> &[u8] {
        self.id
    }

    #[inline]
    pub fn desc(&self) -> Option<&[u8]> {
        self.desc
    }

    #[inline]
    pub fn seq(&self) -> &[u8] {
        self.seq
    }

    #[inline]
    pub fn qual(&self) -> Option<&[u8]> {
        self.qual
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if let Some(qual) = self.qual {
            if self.seq.len() != qual.len() {
                return Err(crate::error::FilterError::LengthMismatch {
                    seq_len: self.seq.len(),
                    qual_len: qual.len(),
                });
            }
            for &byte in qual {
                if !(b'!'..=b'~').contains(&byte) {
                    return Err(crate::error::FilterError::OutOfRange {
                        byte,
                        offset: crate::qual::DEFAULT_PHRED_OFFSET,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct OwnedRecord {
    pub id: Vec<u8>,
    pub desc: Option<Vec<u8>>,
    pub seq: Vec<u8>,
    pub qual: Option<Vec<u8>>,
}

impl OwnedRecord {
    pub fn from_record(record: &Record) -> Self {
        OwnedRecord {
            id: record.id.to_vec(),
            desc: record.desc.map(|d| d.to_vec()),
            seq: record.seq.to_vec(),
            qual: record.qual.map(|q| q.to_vec()),
        }
    }

    pub fn as_record(&self) -> Record<'_> {
        Record {
            id: &self.id,
            desc: self.desc.as_deref(),
            seq: &self.seq,
            qual: self.qual.as_deref(),
        }
    }
}
