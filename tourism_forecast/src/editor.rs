//! Add and delete rows on behalf of the user
//!
//! The editor loads the dataset, forwards the raw user input to the store and
//! turns any failure into a one-line message. Whatever happens, the outcome
//! carries the dataset currently on disk so the table can be shown again.

use crate::data::Dataset;
use crate::error::ForecastError;
use crate::store::DatasetStore;

/// Result of an editing action as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum EditStatus {
    /// Nothing was attempted
    Idle,
    /// The action was applied and saved
    Success(String),
    /// The action was rejected; nothing was written
    Failure(String),
}

/// Status message plus the dataset to display afterwards
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub status: EditStatus,
    /// `None` when the dataset could not be loaded at all
    pub dataset: Option<Dataset>,
}

impl EditOutcome {
    fn failure(err: &ForecastError, dataset: Option<Dataset>) -> Self {
        log::debug!("Edit rejected: {}", err);
        Self {
            status: EditStatus::Failure(err.user_message()),
            dataset,
        }
    }

    /// Whether the action succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.status, EditStatus::Success(_))
    }
}

/// Data editor over an injected store
#[derive(Debug)]
pub struct DataEditor<S: DatasetStore> {
    store: S,
}

impl<S: DatasetStore> DataEditor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reload the dataset for display
    pub fn current(&self) -> EditOutcome {
        match self.store.load() {
            Ok(dataset) => EditOutcome {
                status: EditStatus::Idle,
                dataset: Some(dataset),
            },
            Err(err) => EditOutcome::failure(&err, None),
        }
    }

    /// Append a row from the raw month label and tourist count
    pub fn add(&self, period_raw: &str, value_raw: &str) -> EditOutcome {
        let dataset = match self.store.load() {
            Ok(dataset) => dataset,
            Err(err) => return EditOutcome::failure(&err, None),
        };

        match self.store.append(&dataset, period_raw, value_raw) {
            Ok(updated) => EditOutcome {
                status: EditStatus::Success("Data added and saved.".to_string()),
                dataset: Some(updated),
            },
            Err(err) => EditOutcome::failure(&err, self.reload_or(dataset)),
        }
    }

    /// Delete the row at the raw index typed by the user
    pub fn delete(&self, index_raw: &str) -> EditOutcome {
        let dataset = match self.store.load() {
            Ok(dataset) => dataset,
            Err(err) => return EditOutcome::failure(&err, None),
        };

        let index = match index_raw.trim().parse::<i64>() {
            Ok(index) => index,
            Err(_) => {
                let err = ForecastError::ValidationError(format!(
                    "'{}' is not a row index",
                    index_raw.trim()
                ));
                return EditOutcome::failure(&err, Some(dataset));
            }
        };

        match self.store.delete_at(&dataset, index) {
            Ok(updated) => EditOutcome {
                status: EditStatus::Success("Data deleted and saved.".to_string()),
                dataset: Some(updated),
            },
            Err(err) => EditOutcome::failure(&err, self.reload_or(dataset)),
        }
    }

    // After a refused write the file may hold someone else's rows
    fn reload_or(&self, fallback: Dataset) -> Option<Dataset> {
        Some(self.store.load().unwrap_or(fallback))
    }
}
