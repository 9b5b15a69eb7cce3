use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::loader::{ConfigError, load_config};
use crate::constants::{
    DEFAULT_BUFFER_COUNT, DEFAULT_MIRROR_OFFSET, DEFAULT_NAV_BUFFER_SIZE, DEFAULT_NAV_VOLUME_BASE_SIZE,
};
use crate::geometry::ChunkPrototype;

/// How the streamer picks the prototype for each new chunk pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrototypeSelection {
    /// Uniform random choice; a seed makes the level reproducible
    Uniform {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Cycle through the prototypes in configuration order
    Sequential,
}

impl Default for PrototypeSelection {
    fn default() -> Self {
        Self::Uniform { seed: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamerConfig {
    /// Chunk pairs kept on either side of the player's chunk
    #[serde(default = "default_buffer_count")]
    pub buffer_count: u32,
    /// Lateral distance between a chunk and its mirrored twin
    #[serde(default = "default_mirror_offset")]
    pub mirror_offset: f32,
    #[serde(default)]
    pub selection: PrototypeSelection,
    #[serde(default)]
    pub prototypes: Vec<ChunkPrototype>,
}

fn default_buffer_count() -> u32 {
    DEFAULT_BUFFER_COUNT
}

fn default_mirror_offset() -> f32 {
    DEFAULT_MIRROR_OFFSET
}

impl StreamerConfig {
    pub fn new(prototypes: Vec<ChunkPrototype>, buffer_count: u32) -> Self {
        Self {
            buffer_count,
            mirror_offset: DEFAULT_MIRROR_OFFSET,
            selection: PrototypeSelection::default(),
            prototypes,
        }
    }

    pub fn with_mirror_offset(mut self, mirror_offset: f32) -> Self {
        self.mirror_offset = mirror_offset;
        self
    }

    pub fn with_selection(mut self, selection: PrototypeSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn window_width(&self) -> usize {
        2 * self.buffer_count as usize + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prototypes.is_empty() {
            return Err(ConfigError::NoPrototypes);
        }
        if self.buffer_count == 0 {
            return Err(ConfigError::InvalidBufferCount(self.buffer_count));
        }
        if !self.mirror_offset.is_finite() {
            return Err(ConfigError::InvalidMirrorOffset(self.mirror_offset));
        }
        if let Some(prototype) = self.prototypes.iter().find(|p| !p.local_bounds().is_valid()) {
            return Err(ConfigError::DegeneratePrototype {
                name: prototype.name.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavSyncConfig {
    /// Chunks either side of the center that need nav coverage
    #[serde(default = "default_nav_buffer_size")]
    pub buffer_size: u32,
    /// Edge length of the bounds volume at unit scale
    #[serde(default = "default_volume_base_size")]
    pub volume_base_size: f32,
}

fn default_nav_buffer_size() -> u32 {
    DEFAULT_NAV_BUFFER_SIZE
}

fn default_volume_base_size() -> f32 {
    DEFAULT_NAV_VOLUME_BASE_SIZE
}

impl Default for NavSyncConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_NAV_BUFFER_SIZE,
            volume_base_size: DEFAULT_NAV_VOLUME_BASE_SIZE,
        }
    }
}

impl NavSyncConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::InvalidNavBuffer(self.buffer_size));
        }
        if !self.volume_base_size.is_finite() || self.volume_base_size <= 0.0 {
            return Err(ConfigError::InvalidVolumeSize(self.volume_base_size));
        }
        Ok(())
    }
}

/// Everything the hosting application configures for a streamed level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub streaming: StreamerConfig,
    #[serde(default)]
    pub navigation: NavSyncConfig,
}

impl LevelConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: LevelConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.streaming.validate()?;
        self.navigation.validate()
    }
}
