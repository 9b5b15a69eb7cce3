use bevy::prelude::*;

use crate::config::{ConfigError, LevelConfig};
use crate::navigation::{NavRegionHandle, NavRegionPlugin};
use crate::streaming::{LevelStreamer, SceneWorld, StreamingPlugin};

/// Chunk streaming plus the nav region that follows it.
pub struct LevelStreamingPlugin {
    pub config: LevelConfig,
}

impl LevelStreamingPlugin {
    pub fn new(config: LevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Plugin for LevelStreamingPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_plugins(StreamingPlugin {
                config: self.config.streaming.clone(),
            })
            .add_plugins(NavRegionPlugin {
                config: self.config.navigation.clone(),
            });
    }
}

/// Detaches the nav sync and destroys every streamed chunk.
pub fn teardown_level(world: &mut World) {
    let Some(mut streamer) = world.remove_resource::<LevelStreamer>() else {
        warn!("No level streamer to tear down");
        return;
    };

    if let Some(handle) = world.get_resource::<NavRegionHandle>() {
        match handle.0.lock() {
            Ok(mut sync) => {
                if let Err(err) = sync.detach(&mut streamer) {
                    debug!("Nav region sync not detached: {}", err);
                }
            }
            Err(_) => warn!("Nav region sync lock poisoned during teardown"),
        }
    }

    streamer.shutdown(&mut SceneWorld::new(world));
    world.insert_resource(streamer);
}
