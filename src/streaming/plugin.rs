use bevy::prelude::*;

use crate::config::{ConfigError, StreamerConfig};
use crate::sensor::detect_chunk_entry;
use crate::streaming::scene::SceneWorld;
use crate::streaming::streamer::LevelStreamer;

pub struct StreamingPlugin {
    pub config: StreamerConfig,
}

impl StreamingPlugin {
    pub fn new(config: StreamerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// Ordering points for systems that read the chunk window.
///
/// ```text
/// Startup: Fill (initial window)
/// Update:  Sense (sensor + synchronous slide)
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamingSet {
    Fill,
    Sense,
}

impl Plugin for StreamingPlugin {
    fn build(&self, app: &mut App) {
        // No streamer resource means every streaming system stays idle
        if let Err(err) = self.config.validate() {
            error!("Level streaming disabled, invalid configuration: {}", err);
            return;
        }

        app
            .insert_resource(LevelStreamer::new(self.config.clone()))
            .add_systems(Startup, spawn_initial_window.in_set(StreamingSet::Fill))
            .add_systems(Update, detect_chunk_entry.in_set(StreamingSet::Sense));
    }
}

// Exclusive so chunk bounds are measured the moment each pair is placed
pub fn spawn_initial_window(world: &mut World) {
    if !world.contains_resource::<LevelStreamer>() {
        warn!("No level streamer resource, skipping initial window");
        return;
    }
    world.resource_scope(|world, mut streamer: Mut<LevelStreamer>| {
        if let Err(err) = streamer.initialize(&mut SceneWorld::new(world)) {
            error!("Level streaming disabled: {}", err);
        }
    });
}
