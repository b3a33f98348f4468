mod setup;

pub use setup::{
    expand_date_placeholders, init_default_logger, init_logger, prepare_log_dir, LogConfig,
    LogFileConfig,
};
