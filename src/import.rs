//! Performance-history and heart-rate-series import
//!
//! Reads CSV history files of completed runs into validated
//! [`PerformanceSample`] values, with flexible column naming. All
//! coercion happens here; the analytics modules never see an untyped
//! value.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::duration::parse_duration;
use crate::error::{ImportError, ParseError, Result};
use crate::models::PerformanceSample;

/// Outcome counts for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    /// Rows converted into samples
    pub imported: usize,
    /// Rows dropped for unusable distance or date
    pub skipped: usize,
}

/// CSV history importer with flexible column mapping
pub struct HistoryImporter {
    column_mapping: HashMap<String, String>,
}

impl Default for HistoryImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        // Common column name variations
        Self::add_mapping(
            &mut column_mapping,
            "distance_km",
            &["distance_km", "distance", "dist", "km"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "time",
            &["time", "duration", "elapsed", "elapsed_time", "finish_time"],
        );
        Self::add_mapping(&mut column_mapping, "date", &["date", "day", "run_date"]);

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    /// Import a performance-history CSV file.
    ///
    /// Requires `distance_km`, `time` and `date` columns (or recognized
    /// variations). Rows with an unusable distance or date are skipped
    /// with a warning; malformed time strings decode to zero seconds per
    /// the lenient codec policy and are left to the analytics layer to
    /// disregard.
    pub fn import_file(&self, path: &Path) -> Result<(Vec<PerformanceSample>, ImportSummary)> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(ImportError::Csv)?;

        let headers = reader.headers().map_err(ImportError::Csv)?.clone();
        let column_index = |standard: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| self.normalize_column_name(h) == standard)
                .ok_or_else(|| {
                    ImportError::MissingColumn {
                        column: standard.to_string(),
                    }
                    .into()
                })
        };

        let distance_idx = column_index("distance_km")?;
        let time_idx = column_index("time")?;
        let date_idx = column_index("date")?;

        let mut samples = Vec::new();
        let mut summary = ImportSummary::default();

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(ImportError::Csv)?;

            let distance_text = record.get(distance_idx).unwrap_or("");
            let distance_km = match Self::parse_distance(distance_text) {
                Some(d) => d,
                None => {
                    warn!(row, value = distance_text, "skipping row with unusable distance");
                    summary.skipped += 1;
                    continue;
                }
            };

            let date_text = record.get(date_idx).unwrap_or("");
            let date = match Self::parse_date(date_text) {
                Ok(d) => d,
                Err(err) => {
                    warn!(row, %err, "skipping row with unusable date");
                    summary.skipped += 1;
                    continue;
                }
            };

            let seconds = parse_duration(record.get(time_idx).unwrap_or(""));

            samples.push(PerformanceSample {
                distance_km,
                seconds,
                date,
            });
            summary.imported += 1;
        }

        if samples.is_empty() {
            return Err(ImportError::NoUsableRows {
                path: path.to_path_buf(),
            }
            .into());
        }

        debug!(
            imported = summary.imported,
            skipped = summary.skipped,
            "history import finished"
        );

        Ok((samples, summary))
    }

    fn parse_distance(text: &str) -> Option<f64> {
        let decimal = Decimal::from_str(text).ok()?;
        let value = decimal.to_f64()?;
        (value.is_finite() && value > 0.0).then_some(value)
    }

    fn parse_date(text: &str) -> std::result::Result<NaiveDate, ParseError> {
        let formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

        for format in &formats {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Ok(date);
            }
        }

        Err(ParseError::InvalidDate {
            text: text.to_string(),
        })
    }
}

/// Read a heart-rate sample series: one beats-per-minute value per line.
///
/// A leading non-numeric line is treated as a header. Unparseable lines
/// are skipped with a warning so one bad sample does not discard a run.
pub fn read_heart_rate_series(path: &Path) -> Result<Vec<u16>> {
    let content = std::fs::read_to_string(path)?;
    let mut samples = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed.parse::<u16>() {
            Ok(hr) => samples.push(hr),
            Err(_) if index == 0 => {
                debug!(line = trimmed, "skipping header line in heart rate series");
            }
            Err(_) => {
                warn!(line_number = index + 1, line = trimmed, "skipping unparseable heart rate sample");
            }
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunRsError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_import_well_formed_history() {
        let file = write_temp(
            "distance_km,time,date\n\
             10,45:00,2024-06-01\n\
             5,21:30,2024-06-08\n",
        );

        let importer = HistoryImporter::new();
        let (samples, summary) = importer.import_file(file.path()).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(samples[0].distance_km, 10.0);
        assert_eq!(samples[0].seconds, 2700);
        assert_eq!(
            samples[1].date,
            NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()
        );
    }

    #[test]
    fn test_import_accepts_column_variations() {
        let file = write_temp(
            "Distance,Duration,Run Date\n\
             21.0975,1:45:00,2024-05-20\n",
        );

        let importer = HistoryImporter::new();
        let (samples, _) = importer.import_file(file.path()).unwrap();
        assert_eq!(samples[0].seconds, 6300);
    }

    #[test]
    fn test_import_skips_unusable_rows() {
        let file = write_temp(
            "distance_km,time,date\n\
             0,45:00,2024-06-01\n\
             banana,30:00,2024-06-02\n\
             10,44:00,not-a-date\n\
             10,43:00,2024-06-04\n",
        );

        let importer = HistoryImporter::new();
        let (samples, summary) = importer.import_file(file.path()).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 3);
        assert_eq!(samples[0].seconds, 2580);
    }

    #[test]
    fn test_malformed_time_degrades_to_zero() {
        // Lenient codec policy: the row is kept, the time is zero
        let file = write_temp(
            "distance_km,time,date\n\
             10,quick,2024-06-01\n",
        );

        let importer = HistoryImporter::new();
        let (samples, summary) = importer.import_file(file.path()).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(samples[0].seconds, 0);
    }

    #[test]
    fn test_missing_column_error() {
        let file = write_temp("distance_km,date\n10,2024-06-01\n");

        let importer = HistoryImporter::new();
        let err = importer.import_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RunRsError::Import(ImportError::MissingColumn { ref column }) if column == "time"
        ));
    }

    #[test]
    fn test_no_usable_rows_error() {
        let file = write_temp("distance_km,time,date\nzero,45:00,2024-06-01\n");

        let importer = HistoryImporter::new();
        let err = importer.import_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RunRsError::Import(ImportError::NoUsableRows { .. })
        ));
    }

    #[test]
    fn test_read_heart_rate_series() {
        let file = write_temp("hr\n142\n156\n\n171\nnoise\n149\n");

        let samples = read_heart_rate_series(file.path()).unwrap();
        assert_eq!(samples, vec![142, 156, 171, 149]);
    }
}
