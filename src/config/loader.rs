use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no chunk prototypes configured, refusing to stream an empty world")]
    NoPrototypes,
    #[error("streaming buffer count must be at least 1 (got {0})")]
    InvalidBufferCount(u32),
    #[error("navigation buffer size must be at least 1 (got {0})")]
    InvalidNavBuffer(u32),
    #[error("mirror offset must be finite (got {0})")]
    InvalidMirrorOffset(f32),
    #[error("nav bounds volume base size must be positive and finite (got {0})")]
    InvalidVolumeSize(f32),
    #[error("chunk prototype '{name}' has degenerate bounds")]
    DegeneratePrototype { name: String },
}

pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_yaml::from_reader(reader)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
