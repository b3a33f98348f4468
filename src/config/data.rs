use super::traits::ConfigSection;
use crate::error::SlidecvError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub reduce_memory: bool,
    pub min_rows: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            reduce_memory: false,
            min_rows: 1,
        }
    }
}

impl ConfigSection for DataSettings {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), SlidecvError> {
        if self.min_rows == 0 {
            return Err(SlidecvError::Configuration(
                "Minimum row count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
