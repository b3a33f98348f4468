use super::types::{RowId, Window};
use crate::error::{Result, SlidecvError};
use std::fmt::Debug;

/// Read-only tabular source the splitter works against.
pub trait TimeSeriesTable {
    type Value: PartialOrd + Clone + Debug;

    fn num_rows(&self) -> usize;

    /// Values of `name` in original row order
    fn get_column(&self, name: &str) -> Result<Vec<Self::Value>>;

    /// Row ids whose `name` value lies in the closed `window`, in original row order
    fn select_rows(&self, name: &str, window: &Window<Self::Value>) -> Result<Vec<RowId>> {
        let values = self.get_column(name)?;
        Ok(values
            .iter()
            .enumerate()
            .filter(|(_, value)| window.contains(value))
            .map(|(row, _)| row)
            .collect())
    }
}

/// Single time column held in memory
#[derive(Debug, Clone)]
pub struct InMemoryTable<T> {
    column: String,
    values: Vec<T>,
}

impl<T> InMemoryTable<T> {
    pub fn new(column: impl Into<String>, values: Vec<T>) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: PartialOrd + Clone + Debug> TimeSeriesTable for InMemoryTable<T> {
    type Value = T;

    fn num_rows(&self) -> usize {
        self.values.len()
    }

    fn get_column(&self, name: &str) -> Result<Vec<T>> {
        if name != self.column {
            return Err(SlidecvError::ColumnNotFound(name.to_string()));
        }
        Ok(self.values.clone())
    }
}
