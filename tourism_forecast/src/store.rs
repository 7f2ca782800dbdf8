//! Persistence of the dataset
//!
//! Every successful mutation rewrites the whole file. Writes are guarded by the
//! dataset's version stamp: if the file changed since the dataset was loaded,
//! the write is refused and the file is left as it is.

use crate::data::{Dataset, Observation, Version, DEFAULT_TIME_COLUMN};
use crate::error::{ForecastError, Result};
use crate::period::Month;
use crate::utils::parse_count;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage backend for the dataset
pub trait DatasetStore {
    /// Load the current dataset
    fn load(&self) -> Result<Dataset>;

    /// Validate and append one row, then persist
    fn append(&self, dataset: &Dataset, period_label: &str, value: &str) -> Result<Dataset>;

    /// Remove the row at `index`, then persist
    fn delete_at(&self, dataset: &Dataset, index: i64) -> Result<Dataset>;
}

/// Dataset stored as a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    path: PathBuf,
    time_column: String,
}

impl CsvDatasetStore {
    /// Create a store backed by the CSV file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            time_column: DEFAULT_TIME_COLUMN.to_string(),
        }
    }

    /// Name of the month column to look for when reading the header
    pub fn with_time_column(mut self, time_column: impl Into<String>) -> Self {
        self.time_column = time_column.into();
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ForecastError::NotFound(self.path.clone()),
            _ => ForecastError::IoError(e),
        })
    }

    /// Rewrite the file with `dataset`, provided the file still matches `expected`
    fn persist(&self, dataset: &mut Dataset, expected: Option<Version>) -> Result<()> {
        if let Some(expected) = expected {
            let current = Version::of_bytes(&self.read_bytes()?);
            if current != expected {
                log::warn!(
                    "Refusing to write {}: file changed since it was loaded",
                    self.path.display()
                );
                return Err(ForecastError::ConcurrentModification);
            }
        }

        let bytes = dataset.to_csv_bytes()?;
        fs::write(&self.path, &bytes)?;
        dataset.set_version(Version::of_bytes(&bytes));
        Ok(())
    }
}

impl DatasetStore for CsvDatasetStore {
    fn load(&self) -> Result<Dataset> {
        let bytes = self.read_bytes()?;
        let dataset = Dataset::from_csv_bytes_with_time_column(&bytes, &self.time_column)?;
        log::debug!("Loaded {} rows from {}", dataset.len(), self.path.display());
        Ok(dataset)
    }

    fn append(&self, dataset: &Dataset, period_label: &str, value: &str) -> Result<Dataset> {
        let month = Month::parse_label(period_label)?;
        let count = parse_count(value)?;

        let mut updated = dataset.clone();
        updated.push(Observation::new(month.to_string(), count));
        self.persist(&mut updated, dataset.version())?;

        log::info!(
            "Appended {} = {} to {} ({} rows)",
            month,
            count,
            self.path.display(),
            updated.len()
        );
        Ok(updated)
    }

    fn delete_at(&self, dataset: &Dataset, index: i64) -> Result<Dataset> {
        let len = dataset.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(ForecastError::RangeError { index, len })?;

        let mut updated = dataset.clone();
        let removed = updated.remove(position);
        self.persist(&mut updated, dataset.version())?;

        log::info!(
            "Deleted row {} ({}) from {} ({} rows left)",
            position,
            removed.period,
            self.path.display(),
            updated.len()
        );
        Ok(updated)
    }
}

impl<T: DatasetStore + ?Sized> DatasetStore for &T {
    fn load(&self) -> Result<Dataset> {
        (**self).load()
    }

    fn append(&self, dataset: &Dataset, period_label: &str, value: &str) -> Result<Dataset> {
        (**self).append(dataset, period_label, value)
    }

    fn delete_at(&self, dataset: &Dataset, index: i64) -> Result<Dataset> {
        (**self).delete_at(dataset, index)
    }
}
