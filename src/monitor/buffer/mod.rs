//! Disk-backed Sliding Window Buffer
//!
//! Holds the most recent `capacity` records of one kind and mirrors them to a
//! CSV file after every append, so an accumulation window survives a process
//! restart. Oldest records are evicted first.
//!
//! Cells are written with [`FeatureValue::encode_cell`], so a reopened
//! buffer yields exactly the records that were appended.
//!
//! Writes go to a sibling temporary file that is renamed over the backing
//! file; the in-memory window is only committed once the rename succeeded.

mod error;

pub use error::{BufferError, BufferResult};

use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::monitor::sample::{FeatureValue, TabularRecord};

/// Outcome of [`SampleBuffer::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferStatus {
    /// Fewer than `capacity` records are buffered
    NotFull,
    /// The buffer holds exactly `capacity` records
    Full,
}

impl BufferStatus {
    pub fn is_full(self) -> bool {
        self == Self::Full
    }
}

/// Bounded FIFO of records persisted to a CSV file.
#[derive(Debug)]
pub struct SampleBuffer<R: TabularRecord> {
    path: PathBuf,
    capacity: usize,
    records: VecDeque<R>,
}

impl<R: TabularRecord> SampleBuffer<R> {
    /// Open a buffer, loading the backing file if it exists.
    ///
    /// A missing or empty file yields an empty buffer. A file with more rows
    /// than `capacity` keeps only the newest `capacity` rows.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let path = path.as_ref().to_path_buf();
        let mut records = load_records::<R>(&path)?;
        while records.len() > capacity {
            records.pop_front();
        }
        Ok(Self { path, capacity, records })
    }

    /// Append a record, evicting the oldest one when at capacity, and persist
    /// the new window.
    ///
    /// On error neither the file nor the in-memory window changes.
    pub fn append(&mut self, record: R) -> BufferResult<BufferStatus> {
        self.push(record).map(|(status, _)| status)
    }

    /// Append and return the evicted record so the caller can undo the push.
    pub(crate) fn push(&mut self, record: R) -> BufferResult<(BufferStatus, Option<R>)> {
        let found = record.columns();
        if found.is_empty() {
            return Err(BufferError::EmptyRecord);
        }
        if let Some(first) = self.records.front() {
            let expected = first.columns();
            if expected != found {
                return Err(BufferError::SchemaMismatch { expected, found });
            }
        }

        let evict = usize::from(self.records.len() == self.capacity);
        self.persist(self.records.iter().skip(evict).chain(std::iter::once(&record)))?;

        let evicted = if evict == 1 { self.records.pop_front() } else { None };
        self.records.push_back(record);
        Ok((self.status(), evicted))
    }

    /// Revert the most recent [`SampleBuffer::push`], restoring the record it
    /// evicted.
    pub(crate) fn undo_push(&mut self, evicted: Option<R>) -> BufferResult<()> {
        if self.records.is_empty() {
            return Ok(());
        }
        let keep = self.records.len() - 1;
        self.persist(evicted.iter().chain(self.records.iter().take(keep)))?;

        self.records.pop_back();
        if let Some(record) = evicted {
            self.records.push_front(record);
        }
        Ok(())
    }

    /// Drop every record and delete the backing file.
    pub fn clear(&mut self) -> BufferResult<()> {
        self.remove_file()?;
        self.forget();
        Ok(())
    }

    /// Delete the backing file, leaving the in-memory window as is.
    pub(crate) fn remove_file(&self) -> BufferResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BufferError::io(&self.path, e)),
        }
    }

    /// Empty the in-memory window without touching the file.
    pub(crate) fn forget(&mut self) {
        self.records.clear();
    }

    /// Write the in-memory window back to the backing file.
    pub(crate) fn restore_file(&self) -> BufferResult<()> {
        if self.records.is_empty() {
            return self.remove_file();
        }
        self.persist(self.records.iter())
    }

    /// Owned copy of the buffered records, oldest first.
    pub fn snapshot(&self) -> Vec<R> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn status(&self) -> BufferStatus {
        if self.records.len() == self.capacity {
            BufferStatus::Full
        } else {
            BufferStatus::NotFull
        }
    }

    fn persist<'a, I>(&self, records: I) -> BufferResult<()>
    where
        I: Iterator<Item = &'a R>,
    {
        let tmp = tmp_path(&self.path);
        let result = write_records(&tmp, records).and_then(|()| {
            fs::rename(&tmp, &self.path).map_err(|e| BufferError::io(&self.path, e))
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_records<'a, R, I>(path: &Path, records: I) -> BufferResult<()>
where
    R: TabularRecord,
    I: Iterator<Item = &'a R>,
{
    let mut writer = csv::Writer::from_path(path).map_err(|e| BufferError::csv(path, e))?;
    let mut header_written = false;
    for record in records {
        if !header_written {
            writer.write_record(record.columns()).map_err(|e| BufferError::csv(path, e))?;
            header_written = true;
        }
        writer
            .write_record(record.values().iter().map(FeatureValue::encode_cell))
            .map_err(|e| BufferError::csv(path, e))?;
    }
    let file = writer.into_inner().map_err(|e| BufferError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| BufferError::io(path, e))
}

fn load_records<R: TabularRecord>(path: &Path) -> BufferResult<VecDeque<R>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == ErrorKind::NotFound {
                    return Ok(VecDeque::new());
                }
            }
            return Err(BufferError::csv(path, e));
        }
    };

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| BufferError::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = VecDeque::new();
    for row in reader.records() {
        let row = row.map_err(|e| BufferError::csv(path, e))?;
        let line = row.position().map_or(0, csv::Position::line);
        let values = row.iter().map(FeatureValue::decode_cell).collect();
        let record = R::from_values(&header, values).map_err(|e| BufferError::Corrupt {
            path: path.to_path_buf(),
            line,
            message: e.0,
        })?;
        records.push_back(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests;
