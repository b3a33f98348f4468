use crate::data::frame::is_supported_time_dtype;
use crate::error::{Result, SlidecvError};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Check that `column` exists, can be ordered, and has no nulls.
    pub fn validate_time_column(df: &DataFrame, column: &str) -> Result<()> {
        let series = df
            .column(column)
            .map_err(|_| SlidecvError::ColumnNotFound(column.to_string()))?;

        if !is_supported_time_dtype(series.dtype()) {
            return Err(SlidecvError::Data(format!(
                "Column '{}' must be numeric, temporal or string, found {:?}",
                column,
                series.dtype()
            )));
        }

        let null_count = series.null_count();
        if null_count > 0 {
            return Err(SlidecvError::Data(format!(
                "Column '{}' has {} null timestamps",
                column, null_count
            )));
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(SlidecvError::Data(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for column in df.get_columns() {
            let null_count = column.null_count();
            if null_count > 0 {
                null_report.push((column.name().to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}
