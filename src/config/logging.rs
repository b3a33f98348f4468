use super::traits::ConfigSection;
use crate::error::SlidecvError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// JSON log config; plain `RUST_LOG` setup when absent
    pub config_path: Option<PathBuf>,
}

impl ConfigSection for LoggingSettings {
    fn section_name() -> &'static str {
        "logging"
    }

    fn validate(&self) -> Result<(), SlidecvError> {
        if let Some(path) = &self.config_path {
            if path.as_os_str().is_empty() {
                return Err(SlidecvError::Configuration(
                    "Log config path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
