use crate::error::{FilterError, Result};
use crate::reader::FastxReader;
use crate::record::OwnedRecord;
use std::io;
use std::path::Path;

/// Zips N record iterators into synchronized groups, one record from
/// each input per step. Group members must be mates of the same
/// molecule and all inputs must hold the same number of records.
pub struct SyncedReader {
    readers: Vec<Box<dyn Iterator<Item = Result<OwnedRecord>> + Send>>,
    check_mates: bool,
}

impl SyncedReader {
    /// Opens each path (`-` for stdin); compression is detected per file.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut readers = Vec::with_capacity(paths.len());
        for path in paths {
            let reader = if path.as_ref().as_os_str() == "-" {
                FastxReader::from_reader(io::stdin())
            } else {
                FastxReader::from_path(path)?
            };
            readers.push(reader.into_records());
        }
        Ok(Self::from_iterators(readers))
    }

    pub fn from_iterators(
        readers: Vec<Box<dyn Iterator<Item = Result<OwnedRecord>> + Send>>,
    ) -> Self {
        SyncedReader {
            readers,
            check_mates: true,
        }
    }

    pub fn check_mates(mut self, check: bool) -> Self {
        self.check_mates = check;
        self
    }

    pub fn arity(&self) -> usize {
        self.readers.len()
    }

    fn next_group(&mut self) -> Result<Option<Vec<OwnedRecord>>> {
        let mut group = Vec::with_capacity(self.readers.len());
        let mut exhausted = 0usize;
        for reader in &mut self.readers {
            match reader.next() {
                Some(record) => group.push(record?),
                None => exhausted += 1,
            }
        }

        if exhausted == self.readers.len() {
            return Ok(None);
        }
        if exhausted > 0 {
            return Err(FilterError::UnequalRecordCounts);
        }
        if self.check_mates && group.len() > 1 && !records_are_mates(&group) {
            let names: Vec<String> = group
                .iter()
                .map(|r| String::from_utf8_lossy(&r.id).into_owned())
                .collect();
            return Err(FilterError::GroupOutOfSync {
                names: names.join(", "),
            });
        }
        Ok(Some(group))
    }
}

impl Iterator for SyncedReader {
    type Item = Result<Vec<OwnedRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_group().transpose()
    }
}

fn records_are_mates(group: &[OwnedRecord]) -> bool {
    let first = base_id(&group[0].id);
    group[1..].iter().all(|r| base_id(&r.id) == first)
}

/// Strips a read-pair suffix (`/1`, `/2`) or comment so that mates from
/// R1/R2 files compare equal.
fn base_id(id: &[u8]) -> &[u8] {
    let end = id
        .iter()
        .position(|&b| b == b' ' || b == b'/')
        .unwrap_or(id.len());
    &id[..end]
}
