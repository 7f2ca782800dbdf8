//! Dataset of monthly tourist counts and its CSV representation

use crate::error::{ForecastError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Default name of the month column
pub const DEFAULT_TIME_COLUMN: &str = "Bulan";

/// Default name of the tourist count column
pub const DEFAULT_VALUE_COLUMN: &str = "Jumlah Wisatawan";

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Month label exactly as stored, e.g. `2024-03`
    pub period: String,
    /// Tourist count; `None` when the stored cell is blank or not a number
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value: Some(value),
        }
    }
}

/// SHA-256 fingerprint of the file contents a dataset was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version([u8; 32]);

impl Version {
    /// Fingerprint raw file bytes
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut stamp = [0u8; 32];
        stamp.copy_from_slice(&digest);
        Version(stamp)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0[..4].iter().try_for_each(|b| write!(f, "{:02x}", b))
    }
}

/// Ordered table of observations with a two-column header
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Name of the time column
    time_column: String,
    /// Name of the value column
    value_column: String,
    /// Rows in on-disk order
    observations: Vec<Observation>,
    /// Position of the time column in the file header (0 or 1)
    time_position: usize,
    /// Fingerprint of the source file, if the dataset came from one
    version: Option<Version>,
}

impl Dataset {
    /// Create an empty dataset with the given column names
    pub fn new(time_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into(),
            value_column: value_column.into(),
            observations: Vec::new(),
            time_position: 0,
            version: None,
        }
    }

    /// Create a dataset from existing rows
    pub fn with_observations(
        time_column: impl Into<String>,
        value_column: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            observations,
            ..Self::new(time_column, value_column)
        }
    }

    /// Parse CSV bytes with a header row of exactly two columns
    ///
    /// The time column is the one named [`DEFAULT_TIME_COLUMN`], or the first
    /// column when neither header has that name.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_csv_bytes_with_time_column(bytes, DEFAULT_TIME_COLUMN)
    }

    /// Parse CSV bytes, taking `time_column` as the month column wherever it appears
    ///
    /// Short rows are kept with a missing value; extra cells are ignored.
    pub fn from_csv_bytes_with_time_column(bytes: &[u8], time_column: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        if headers.len() != 2 {
            return Err(ForecastError::ValidationError(format!(
                "Expected a header with 2 columns, found {}",
                headers.len()
            )));
        }

        let time_position = usize::from(
            headers[1].trim() == time_column && headers[0].trim() != time_column,
        );
        let value_position = 1 - time_position;

        let mut dataset = Dataset::new(
            headers[time_position].trim(),
            headers[value_position].trim(),
        );
        dataset.time_position = time_position;
        for record in reader.records() {
            let record = record?;
            let period = record.get(time_position).unwrap_or_default().trim().to_string();
            let raw_value = record.get(value_position).unwrap_or_default();
            let value = parse_stored_value(raw_value);
            if value.is_none() && !raw_value.trim().is_empty() {
                log::debug!("Row {} has a non-numeric value '{}'", dataset.len(), raw_value);
            }
            dataset.observations.push(Observation { period, value });
        }

        dataset.version = Some(Version::of_bytes(bytes));
        Ok(dataset)
    }

    /// Serialize to CSV bytes: header row then one row per observation,
    /// keeping the column order the file was read with
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let ordered = |time: &str, value: &str| -> [String; 2] {
            if self.time_position == 0 {
                [time.to_string(), value.to_string()]
            } else {
                [value.to_string(), time.to_string()]
            }
        };

        writer.write_record(ordered(&self.time_column, &self.value_column))?;
        for obs in &self.observations {
            let value = obs.value.map(|v| v.to_string()).unwrap_or_default();
            writer.write_record(ordered(&obs.period, &value))?;
        }
        writer
            .into_inner()
            .map_err(|e| ForecastError::IoError(e.into_error()))
    }

    /// Get the time column name
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Get the value column name
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Columns that can be forecast (everything except the time column)
    pub fn value_columns(&self) -> Vec<&str> {
        vec![self.value_column.as_str()]
    }

    /// Get the rows in order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the version stamp of the file this dataset was loaded from
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub(crate) fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Observation {
        self.observations.remove(index)
    }

    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = Some(version);
    }
}

/// Blank or unparseable cells become `None`
fn parse_stored_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.len().saturating_sub(1).to_string().len().max(1);
        let period_width = self
            .observations
            .iter()
            .map(|o| o.period.len())
            .chain(std::iter::once(self.time_column.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>iw$}  {:<pw$}  {}",
            "",
            self.time_column,
            self.value_column,
            iw = index_width,
            pw = period_width
        )?;
        for (i, obs) in self.observations.iter().enumerate() {
            let value = match obs.value {
                Some(v) => format!("{}", v),
                None => "NaN".to_string(),
            };
            writeln!(
                f,
                "{:>iw$}  {:<pw$}  {}",
                i,
                obs.period,
                value,
                iw = index_width,
                pw = period_width
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_csv_bytes() {
        let bytes = b"Bulan,Jumlah Wisatawan\n2023-01,1500\n2023-02,\n2023-03,n/a\n";
        let dataset = Dataset::from_csv_bytes(bytes).unwrap();

        assert_eq!(dataset.time_column(), "Bulan");
        assert_eq!(dataset.value_column(), "Jumlah Wisatawan");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.observations()[0], Observation::new("2023-01", 1500.0));
        assert_eq!(dataset.observations()[1].value, None);
        assert_eq!(dataset.observations()[2].value, None);
        assert!(dataset.version().is_some());
    }

    #[test]
    fn test_rejects_wrong_header_width() {
        let bytes = b"Bulan,A,B\n2023-01,1,2\n";
        assert!(matches!(
            Dataset::from_csv_bytes(bytes),
            Err(ForecastError::ValidationError(_))
        ));
    }

    #[test]
    fn test_round_trip_keeps_labels() {
        let dataset = Dataset::with_observations(
            "Bulan",
            "Jumlah Wisatawan",
            vec![
                Observation::new("2023-01", 1500.0),
                Observation::new("2023-02", 1620.5),
            ],
        );
        let bytes = dataset.to_csv_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Bulan,Jumlah Wisatawan\n2023-01,1500\n2023-02,1620.5\n");
    }

    #[test]
    fn test_time_column_found_by_name() {
        let bytes = b"Jumlah Wisatawan,Bulan\n1500,2023-01\n1620,2023-02\n";
        let dataset = Dataset::from_csv_bytes(bytes).unwrap();

        assert_eq!(dataset.time_column(), "Bulan");
        assert_eq!(dataset.value_column(), "Jumlah Wisatawan");
        assert_eq!(dataset.observations()[1], Observation::new("2023-02", 1620.0));

        let text = String::from_utf8(dataset.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(text, "Jumlah Wisatawan,Bulan\n1500,2023-01\n1620,2023-02\n");
    }

    #[test]
    fn test_short_row_becomes_missing_value() {
        let bytes = b"Bulan,Jumlah Wisatawan\n2023-01,10\n2023-02\n2023-03,30,extra\n";
        let dataset = Dataset::from_csv_bytes(bytes).unwrap();

        let values: Vec<Option<f64>> = dataset.observations().iter().map(|o| o.value).collect();
        assert_eq!(values, vec![Some(10.0), None, Some(30.0)]);
        assert_eq!(dataset.observations()[1].period, "2023-02");
    }

    #[test]
    fn test_version_tracks_content() {
        assert_eq!(Version::of_bytes(b"a"), Version::of_bytes(b"a"));
        assert_ne!(Version::of_bytes(b"a"), Version::of_bytes(b"b"));
        // SHA-256("abc")
        assert_eq!(Version::of_bytes(b"abc").to_string(), "ba7816bf");
    }

    #[test]
    fn test_display_lists_indices() {
        let dataset = Dataset::with_observations(
            "Bulan",
            "Jumlah Wisatawan",
            vec![Observation::new("2023-01", 1500.0)],
        );
        let rendered = dataset.to_string();
        assert!(rendered.contains("Jumlah Wisatawan"));
        assert!(rendered.contains("0  2023-01  1500"));
    }
}
