pub mod level;
pub mod loader;

pub use level::{LevelConfig, NavSyncConfig, PrototypeSelection, StreamerConfig};
pub use loader::{ConfigError, load_config};
