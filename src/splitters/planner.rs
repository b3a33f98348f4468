use super::types::{SplitBounds, SplitConfig};
use crate::error::{Result, SlidecvError};

/// Window lengths shared by every fold of one `split` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub n_rows: usize,
    pub n_splits: usize,
    pub n_train: usize,
    pub n_test: usize,
}

impl WindowPlan {
    /// Derive the train/test lengths for `n_rows` sorted timestamps.
    ///
    /// `n_test` absorbs the rounding remainder, so
    /// `n_train * n_splits + n_test == n_rows` always holds.
    pub fn new(n_rows: usize, config: &SplitConfig) -> Result<Self> {
        let n_splits = config.n_splits;
        if n_splits == 0 {
            return Err(SlidecvError::Indexing(
                "n_splits must be at least 1".to_string(),
            ));
        }
        if n_rows == 0 {
            return Err(SlidecvError::Indexing(format!(
                "column '{}' is empty",
                config.timeseries_column
            )));
        }

        let ratio = config.train_ratio * n_splits as f64 + config.test_ratio();
        let n_train = (n_rows as f64 / ratio * config.train_ratio).floor() as usize;

        if n_train == 0 {
            return Err(SlidecvError::Indexing(format!(
                "{} rows cannot fill {} training windows at train_ratio {}",
                n_rows, n_splits, config.train_ratio
            )));
        }

        let n_test = n_rows
            .checked_sub(n_train * n_splits)
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                SlidecvError::Indexing(format!(
                    "no rows left for test windows: {} rows, {} splits of {} training rows",
                    n_rows, n_splits, n_train
                ))
            })?;

        log::debug!(
            "Planned {} splits over {} rows: n_train={}, n_test={}",
            n_splits,
            n_rows,
            n_train,
            n_test
        );

        Ok(Self {
            n_rows,
            n_splits,
            n_train,
            n_test,
        })
    }

    pub fn bounds(&self, fold: usize) -> SplitBounds {
        let train_begin_idx = fold * self.n_train;
        let train_end_idx = train_begin_idx + self.n_train - 1;
        let test_begin_idx = train_end_idx + 1;
        let test_end_idx = test_begin_idx + self.n_test - 1;

        SplitBounds {
            train_begin_idx,
            train_end_idx,
            test_begin_idx,
            test_end_idx,
        }
    }
}
