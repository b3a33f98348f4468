use super::traits::ConfigSection;
use crate::error::SlidecvError;
use crate::splitters::{
    types::validate_train_ratio, SlideWindowSplitter, DEFAULT_N_SPLITS, DEFAULT_TRAIN_RATIO,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub timeseries_column: String,
    pub n_splits: usize,
    pub train_ratio: f64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            timeseries_column: "timestamp".to_string(),
            n_splits: DEFAULT_N_SPLITS,
            train_ratio: DEFAULT_TRAIN_RATIO,
        }
    }
}

impl SplitSettings {
    pub fn build_splitter(&self) -> Result<SlideWindowSplitter, SlidecvError> {
        self.validate()?;
        SlideWindowSplitter::new(
            self.timeseries_column.clone(),
            self.n_splits,
            self.train_ratio,
        )
    }
}

impl ConfigSection for SplitSettings {
    fn section_name() -> &'static str {
        "split"
    }

    fn validate(&self) -> Result<(), SlidecvError> {
        if self.timeseries_column.trim().is_empty() {
            return Err(SlidecvError::Configuration(
                "Time series column must not be empty".to_string(),
            ));
        }
        if self.n_splits == 0 {
            return Err(SlidecvError::Configuration(
                "Number of splits must be at least 1".to_string(),
            ));
        }
        validate_train_ratio(self.train_ratio)
    }
}
