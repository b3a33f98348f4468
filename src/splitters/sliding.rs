use super::base::TimeSeriesTable;
use super::planner::WindowPlan;
use super::types::{DataSplit, SplitConfig, Window, DEFAULT_N_SPLITS, DEFAULT_TRAIN_RATIO};
use crate::error::{Result, SlidecvError};
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Walk-forward splitter with fixed-length sliding train and test windows.
///
/// Each fold trains on `n_train` consecutive timestamps and tests on the
/// `n_test` timestamps right after them. The next fold starts where the
/// previous training window ended, so folds advance by `n_train`.
#[derive(Debug, Clone)]
pub struct SlideWindowSplitter {
    config: SplitConfig,
}

impl SlideWindowSplitter {
    pub fn new(timeseries_column: impl Into<String>, n_splits: usize, train_ratio: f64) -> Result<Self> {
        Ok(Self::from_config(SplitConfig::new(
            timeseries_column,
            n_splits,
            train_ratio,
        )?))
    }

    pub fn with_defaults(timeseries_column: impl Into<String>) -> Self {
        Self::from_config(SplitConfig::default_for(timeseries_column))
    }

    fn from_config(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn n_splits(&self) -> usize {
        self.config.n_splits
    }

    /// Sort the time column, plan the windows and return a lazy iterator over
    /// the folds. Every call starts over from the raw data.
    pub fn split<'a, D: TimeSeriesTable>(&'a self, data: &'a D) -> Result<SplitIter<'a, D>> {
        let column = self.config.timeseries_column.as_str();
        let sorted = sorted_values(data.get_column(column)?)?;
        if sorted.len() != data.num_rows() {
            return Err(SlidecvError::Data(format!(
                "column '{}' has {} values but the table has {} rows",
                column,
                sorted.len(),
                data.num_rows()
            )));
        }
        let plan = WindowPlan::new(sorted.len(), &self.config)?;

        Ok(SplitIter {
            data,
            column,
            sorted,
            plan,
            next_fold: 0,
        })
    }

    pub fn split_all<D: TimeSeriesTable>(&self, data: &D) -> Result<Vec<DataSplit<D::Value>>> {
        self.split(data)?.collect()
    }
}

impl Default for SlideWindowSplitter {
    fn default() -> Self {
        Self::from_config(SplitConfig {
            timeseries_column: String::from("timestamp"),
            n_splits: DEFAULT_N_SPLITS,
            train_ratio: DEFAULT_TRAIN_RATIO,
        })
    }
}

/// Stable ascending sort. NaN-like values have no place in the order and are rejected.
fn sorted_values<T: PartialOrd>(mut values: Vec<T>) -> Result<Vec<T>> {
    if let Some(row) = values.iter().position(|v| v.partial_cmp(v).is_none()) {
        return Err(SlidecvError::Data(format!(
            "time column holds an unordered value at row {}",
            row
        )));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Ok(values)
}

pub struct SplitIter<'a, D: TimeSeriesTable> {
    data: &'a D,
    column: &'a str,
    sorted: Vec<D::Value>,
    plan: WindowPlan,
    next_fold: usize,
}

impl<'a, D: TimeSeriesTable> SplitIter<'a, D> {
    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    fn value_at(&self, idx: usize) -> Result<D::Value> {
        self.sorted.get(idx).cloned().ok_or_else(|| {
            SlidecvError::Indexing(format!(
                "position {} is outside the {} sorted rows of '{}'",
                idx,
                self.sorted.len(),
                self.column
            ))
        })
    }

    fn build_fold(&self, fold: usize) -> Result<DataSplit<D::Value>> {
        let bounds = self.plan.bounds(fold);

        let train_window = Window::new(
            self.value_at(bounds.train_begin_idx)?,
            self.value_at(bounds.train_end_idx)?,
        );
        let test_window = Window::new(
            self.value_at(bounds.test_begin_idx)?,
            self.value_at(bounds.test_end_idx)?,
        );

        let train_ids = self.data.select_rows(self.column, &train_window)?;
        let test_ids = self.data.select_rows(self.column, &test_window)?;

        log::debug!(
            "Fold {}: train {:?}..={:?} ({} rows), test {:?}..={:?} ({} rows)",
            fold,
            train_window.begin,
            train_window.end,
            train_ids.len(),
            test_window.begin,
            test_window.end,
            test_ids.len()
        );

        Ok(DataSplit {
            fold_num: fold,
            bounds,
            train_window,
            test_window,
            train_ids,
            test_ids,
        })
    }
}

impl<'a, D: TimeSeriesTable> Iterator for SplitIter<'a, D> {
    type Item = Result<DataSplit<D::Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_fold >= self.plan.n_splits {
            return None;
        }
        let fold = self.next_fold;
        self.next_fold += 1;
        Some(self.build_fold(fold))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.n_splits - self.next_fold;
        (remaining, Some(remaining))
    }
}

impl<'a, D: TimeSeriesTable> ExactSizeIterator for SplitIter<'a, D> {}

impl<'a, D: TimeSeriesTable> FusedIterator for SplitIter<'a, D> {}
