pub mod data;
pub mod logging;
pub mod manager;
pub mod split;
pub mod traits;

pub use data::DataSettings;
pub use logging::LoggingSettings;
pub use manager::{AppConfig, ConfigManager};
pub use split::SplitSettings;
pub use traits::ConfigSection;
