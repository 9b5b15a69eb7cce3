use bevy::log::LogPlugin;
use bevy::prelude::*;
use chunk_streamer::config::{ConfigError, LevelConfig};
use chunk_streamer::navigation::NavDirtyRegions;
use chunk_streamer::plugin::{LevelStreamingPlugin, teardown_level};
use chunk_streamer::sensor::ChunkEntrySensor;
use chunk_streamer::streaming::{LevelStreamer, StreamingSet};

const CONFIG_PATH: &str = "assets/config/level.yaml";
const DEMO_FRAMES: u32 = 600;

/// Walks along the travel axis and turns around at `turn_at`.
#[derive(Component)]
struct Walker {
    speed: f32,
    turn_at: f32,
}

fn main() -> Result<(), ConfigError> {
    let plugin = LevelStreamingPlugin::new(LevelConfig::load(CONFIG_PATH)?)?;

    let mut app = App::new();
    app
        .add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .add_plugins(plugin)
        .add_systems(Startup, spawn_player)
        .add_systems(
            Update,
            (
                walk_player.before(StreamingSet::Sense),
                report_dirty_regions.after(StreamingSet::Sense),
            ),
        );

    // Headless: step the schedule by hand instead of running the loop forever
    for _ in 0..DEMO_FRAMES {
        app.update();
    }

    if let Some(streamer) = app.world().get_resource::<LevelStreamer>() {
        info!(
            "Demo finished at chunk {} with window {:?}",
            streamer.center_index(),
            streamer.window().index_range()
        );
    }
    teardown_level(app.world_mut());
    Ok(())
}

fn spawn_player(mut commands: Commands) {
    commands.spawn((
        Name::new("Player"),
        Transform::from_xyz(50.0, 0.0, 0.0),
        ChunkEntrySensor::default(),
        Walker {
            speed: 20.0,
            turn_at: 4000.0,
        },
    ));
}

fn walk_player(mut walkers: Query<(&mut Transform, &mut Walker)>) {
    for (mut transform, mut walker) in walkers.iter_mut() {
        transform.translation.x += walker.speed;
        if transform.translation.x >= walker.turn_at && walker.speed > 0.0 {
            info!("Player turning back at x = {:.0}", transform.translation.x);
            walker.speed = -walker.speed;
        }
    }
}

fn report_dirty_regions(mut dirty: ResMut<NavDirtyRegions>) {
    for region in dirty.drain() {
        info!("Nav rebuild requested for {:?} .. {:?}", region.min(), region.max());
    }
}
