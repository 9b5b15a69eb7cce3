use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use crate::config::NavSyncConfig;
use crate::geometry::Aabb;
use crate::navigation::index::NavVolumeFeed;
use crate::navigation::region_sync::NavRegionSync;
use crate::streaming::{LevelStreamer, StreamingSet};

pub struct NavRegionPlugin {
    pub config: NavSyncConfig,
}

/// Shared handle to the nav sync; the streamer only keeps a weak reference.
#[derive(Resource, Clone)]
pub struct NavRegionHandle(pub Arc<Mutex<NavRegionSync>>);

#[derive(Resource, Debug, Clone, Copy)]
pub struct NavVolumeSettings {
    /// Edge length of the bounds volume at unit scale
    pub base_size: f32,
}

/// Regions invalidated since the pathfinder last drained them.
#[derive(Resource, Debug, Default)]
pub struct NavDirtyRegions {
    pub regions: Vec<Aabb>,
}

impl NavDirtyRegions {
    pub fn drain(&mut self) -> Vec<Aabb> {
        std::mem::take(&mut self.regions)
    }
}

/// Volume that bounds navigation generation around the streamed chunks.
#[derive(Component, Debug, Default)]
pub struct NavBoundsVolume;

impl Plugin for NavRegionPlugin {
    fn build(&self, app: &mut App) {
        if let Err(err) = self.config.validate() {
            error!("Nav region sync disabled, invalid configuration: {}", err);
            return;
        }

        let feed = NavVolumeFeed::default();
        let sync = NavRegionSync::new(&self.config, Box::new(feed.clone()));

        app
            .insert_resource(feed)
            .insert_resource(NavRegionHandle(Arc::new(Mutex::new(sync))))
            .insert_resource(NavVolumeSettings {
                base_size: self.config.volume_base_size,
            })
            .init_resource::<NavDirtyRegions>()
            .add_systems(
                Startup,
                (
                    spawn_nav_bounds_volume,
                    attach_nav_region.after(StreamingSet::Fill),
                    apply_nav_volume.after(attach_nav_region).after(spawn_nav_bounds_volume),
                ),
            )
            .add_systems(Update, apply_nav_volume.after(StreamingSet::Sense));
    }
}

fn spawn_nav_bounds_volume(mut commands: Commands) {
    commands.spawn((Name::new("NavBoundsVolume"), Transform::default(), NavBoundsVolume));
}

fn attach_nav_region(handle: Res<NavRegionHandle>, streamer: Option<ResMut<LevelStreamer>>) {
    let Some(mut streamer) = streamer else {
        warn!("No level streamer to attach the nav region sync to");
        return;
    };
    match NavRegionSync::attach(&handle.0, &mut streamer) {
        Ok(bounds) => debug!("Initial nav region: {:?}", bounds),
        Err(err) => warn!("Initial nav region not applied: {}", err),
    }
}

/// Moves bounds volumes onto the latest region and queues invalidated regions.
pub fn apply_nav_volume(
    feed: Res<NavVolumeFeed>,
    settings: Res<NavVolumeSettings>,
    mut dirty: ResMut<NavDirtyRegions>,
    mut volumes: Query<&mut Transform, With<NavBoundsVolume>>,
) {
    let update = feed.drain();
    if update.invalidated.is_empty() {
        return;
    }
    dirty.regions.extend(update.invalidated);

    let Some(region) = update.region else {
        return;
    };
    for mut transform in volumes.iter_mut() {
        transform.translation = region.center;
        transform.scale = region.extent * 2.0 / settings.base_size;
    }
}
