use crate::error::{Result, SlidecvError};
use serde::{Deserialize, Serialize};

/// Original position of a row in the dataset handed to the splitter.
pub type RowId = usize;

pub const DEFAULT_N_SPLITS: usize = 5;
pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;

/// Tolerance for the `train_ratio` bounds check, read as "approximately <= / >".
///
/// Tuned for `f64` only; other numeric representations need their own value.
pub const RATIO_TOLERANCE: f64 = f64::EPSILON;

/// Immutable splitter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub timeseries_column: String,
    pub n_splits: usize,
    pub train_ratio: f64, // e.g., 0.7 = 70% of each train+test window is train
}

impl SplitConfig {
    /// Build a config, rejecting a `train_ratio` outside `(0, 1]`.
    ///
    /// `n_splits` is taken as-is; a zero split count surfaces when planning.
    pub fn new(timeseries_column: impl Into<String>, n_splits: usize, train_ratio: f64) -> Result<Self> {
        validate_train_ratio(train_ratio)?;

        Ok(Self {
            timeseries_column: timeseries_column.into(),
            n_splits,
            train_ratio,
        })
    }

    pub fn default_for(timeseries_column: impl Into<String>) -> Self {
        Self {
            timeseries_column: timeseries_column.into(),
            n_splits: DEFAULT_N_SPLITS,
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }

    pub fn test_ratio(&self) -> f64 {
        1.0 - self.train_ratio
    }
}

pub fn validate_train_ratio(train_ratio: f64) -> Result<()> {
    if !train_ratio.is_finite() || is_less(train_ratio, 0.0) || is_greater(train_ratio, 1.0) {
        return Err(SlidecvError::Configuration(format!(
            "train_ratio must be a real number in (0, 1], got {}",
            train_ratio
        )));
    }
    Ok(())
}

fn is_less(a: f64, b: f64) -> bool {
    (a - b) < RATIO_TOLERANCE
}

fn is_greater(a: f64, b: f64) -> bool {
    (a - b) >= RATIO_TOLERANCE
}

/// Closed range `[begin, end]` over time-column values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window<T> {
    pub begin: T,
    pub end: T,
}

impl<T: PartialOrd> Window<T> {
    pub fn new(begin: T, end: T) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.begin <= *value && *value <= self.end
    }
}

/// Positional boundaries of one split in sorted-time order (all inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitBounds {
    pub train_begin_idx: usize,
    pub train_end_idx: usize,
    pub test_begin_idx: usize,
    pub test_end_idx: usize,
}

/// Single walk-forward fold
#[derive(Debug, Clone, PartialEq)]
pub struct DataSplit<T> {
    pub fold_num: usize,
    pub bounds: SplitBounds,
    pub train_window: Window<T>,
    pub test_window: Window<T>,
    pub train_ids: Vec<RowId>,
    pub test_ids: Vec<RowId>,
}

impl<T> DataSplit<T> {
    pub fn into_pair(self) -> (Vec<RowId>, Vec<RowId>) {
        (self.train_ids, self.test_ids)
    }

    /// Rows selected by both windows. Only non-empty when a timestamp is
    /// repeated across the train/test boundary.
    pub fn overlapping_ids(&self) -> Vec<RowId> {
        self.train_ids
            .iter()
            .filter(|id| self.test_ids.contains(id))
            .copied()
            .collect()
    }
}
