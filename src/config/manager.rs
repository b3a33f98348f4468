use super::{
    data::DataSettings, logging::LoggingSettings, split::SplitSettings, traits::ConfigSection,
};
use crate::error::SlidecvError;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

pub const ENV_PREFIX: &str = "SLIDECV";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub split: SplitSettings,
    pub logging: LoggingSettings,
    pub data: DataSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SlidecvError> {
        self.split.validate().map_err(section_error::<SplitSettings>)?;
        self.logging.validate().map_err(section_error::<LoggingSettings>)?;
        self.data.validate().map_err(section_error::<DataSettings>)?;
        Ok(())
    }
}

fn section_error<S: ConfigSection>(err: SlidecvError) -> SlidecvError {
    match err {
        SlidecvError::Configuration(msg) => {
            SlidecvError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    }
}

fn poisoned<T>(_: T) -> SlidecvError {
    SlidecvError::Configuration("Config lock poisoned".to_string())
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SlidecvError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SlidecvError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| SlidecvError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Load a TOML file, then apply `<PREFIX>_<SECTION>__<KEY>` environment overrides
    pub fn load_layered<P: AsRef<Path>>(&self, path: P, env_prefix: &str) -> Result<(), SlidecvError> {
        let layered = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SlidecvError::Configuration(format!("Failed to load config: {}", e)))?;

        let config: AppConfig = layered
            .try_deserialize()
            .map_err(|e| SlidecvError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SlidecvError> {
        let config = self.config.read().map_err(poisoned)?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| SlidecvError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SlidecvError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, SlidecvError> {
        Ok(self.config.read().map_err(poisoned)?.clone())
    }

    /// Apply `f` and keep the result only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), SlidecvError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().map_err(poisoned)?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn replace(&self, config: AppConfig) -> Result<(), SlidecvError> {
        config.validate()?;
        log::debug!("Loaded configuration: {:?}", config);
        *self.config.write().map_err(poisoned)? = config;
        Ok(())
    }
}
