use super::validator::DataValidator;
use crate::error::{Result, SlidecvError};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame, parsing date-like columns where possible
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| SlidecvError::Data(format!("Failed to read CSV: {}", e)))?;

        log::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.as_ref().display()
        );

        Ok(df)
    }

    /// Load a CSV file and check it can be split on `time_column`
    pub fn load_and_validate<P: AsRef<Path>>(
        path: P,
        time_column: &str,
        min_rows: Option<usize>,
    ) -> Result<DataFrame> {
        let df = Self::load(&path)?;

        DataValidator::validate_time_column(&df, time_column)?;
        DataValidator::validate_minimum_rows(&df, min_rows.unwrap_or(1))?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }
}
