use crate::error::{Result, SlidecvError};
use chrono::{DateTime, Local};
use env_logger::{Builder, Target};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const DATE_PLACEHOLDER: &str = "{date:";

/// JSON logging configuration
///
/// ```json
/// {
///   "level": "info",
///   "modules": { "slidecv::splitters": "debug" },
///   "file": { "path": "logs/{date:%Y%m%d}/run.log", "append": true }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub modules: BTreeMap<String, String>,
    pub file: Option<LogFileConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogFileConfig {
    pub path: String,
    #[serde(default = "default_append")]
    pub append: bool,
}

fn default_append() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            modules: BTreeMap::new(),
            file: None,
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| SlidecvError::Logging(format!("Unknown log level '{}'", level)))
}

/// Replace every `{date:<strftime>}` in `template` with `now` rendered in that format.
pub fn expand_date_placeholders(template: &str, now: &DateTime<Local>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(DATE_PLACEHOLDER) {
        let after = &rest[start + DATE_PLACEHOLDER.len()..];
        let end = after.find('}').ok_or_else(|| {
            SlidecvError::Logging(format!("Unterminated date placeholder in '{}'", template))
        })?;
        let format = &after[..end];

        out.push_str(&rest[..start]);
        write!(out, "{}", now.format(format)).map_err(|_| {
            SlidecvError::Logging(format!("Invalid date format '{}' in '{}'", format, template))
        })?;
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Create the parent directory of `log_path` if it has one.
pub fn prepare_log_dir<P: AsRef<Path>>(log_path: P) -> Result<()> {
    if let Some(dir) = log_path.as_ref().parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

impl LogConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            SlidecvError::Logging(format!(
                "Failed to read log config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Copy of this config with date placeholders in the file path expanded
    pub fn resolve_at(&self, now: &DateTime<Local>) -> Result<Self> {
        let mut resolved = self.clone();
        if let Some(file) = resolved.file.as_mut() {
            file.path = expand_date_placeholders(&file.path, now)?;
        }
        Ok(resolved)
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_ref().map(|f| PathBuf::from(&f.path))
    }

    /// Build an `env_logger` builder. `RUST_LOG` still overrides the file settings.
    pub fn builder(&self) -> Result<Builder> {
        let mut builder = Builder::new();
        builder.filter_level(parse_level(&self.level)?);
        for (module, level) in &self.modules {
            builder.filter_module(module, parse_level(level)?);
        }
        builder.parse_default_env();

        if let Some(file) = &self.file {
            prepare_log_dir(&file.path)?;
            let handle = OpenOptions::new()
                .create(true)
                .write(true)
                .append(file.append)
                .truncate(!file.append)
                .open(&file.path)?;
            builder.target(Target::Pipe(Box::new(handle)));
        } else {
            builder.target(Target::Stderr);
        }

        Ok(builder)
    }
}

/// Load a JSON log config, expand the date in its file path, create the log
/// directory and install the global logger.
pub fn init_logger<P: AsRef<Path>>(config_path: P) -> Result<LogConfig> {
    let config = LogConfig::load(config_path)?.resolve_at(&Local::now())?;
    config
        .builder()?
        .try_init()
        .map_err(|e| SlidecvError::Logging(format!("Logger already initialized: {}", e)))?;

    log::debug!("Logging initialized: {:?}", config);
    Ok(config)
}

/// Plain `env_logger` setup driven by `RUST_LOG` only
pub fn init_default_logger() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
