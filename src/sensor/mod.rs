use bevy::prelude::*;

use crate::constants::NO_PREVIOUS_CHUNK;
use crate::geometry::Aabb;
use crate::streaming::{ChunkEntered, ChunkInstance, ChunkTrigger, LevelStreamer, SceneWorld};

/// Tracks which chunk its entity stands in and reports each change once.
#[derive(Component, Debug, Default)]
pub struct ChunkEntrySensor {
    current_index: i32,
    registered: bool,
}

impl ChunkEntrySensor {
    pub fn current_index(&self) -> i32 {
        self.current_index
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// First report: the player starts in chunk 0 with no previous chunk.
    pub fn register(&mut self) -> Option<ChunkEntered> {
        if self.registered {
            return None;
        }
        self.registered = true;
        self.current_index = 0;
        Some(ChunkEntered {
            new_index: 0,
            previous_index: NO_PREVIOUS_CHUNK,
        })
    }

    /// Feeds the chunk indices currently overlapped.
    ///
    /// Staying inside the recorded chunk, even while also touching a
    /// neighbour, reports nothing. Otherwise the overlapped chunk closest
    /// to the recorded one becomes current.
    pub fn observe(&mut self, overlapped: &[i32]) -> Option<ChunkEntered> {
        if !self.registered || overlapped.contains(&self.current_index) {
            return None;
        }
        let current = self.current_index;
        let next = overlapped
            .iter()
            .copied()
            .min_by_key(|index| (index.abs_diff(current), *index))?;

        self.current_index = next;
        Some(ChunkEntered {
            new_index: next,
            previous_index: current,
        })
    }
}

pub fn overlapped_indices(position: Vec3, triggers: &[(i32, Aabb)]) -> Vec<i32> {
    let mut indices: Vec<i32> = triggers
        .iter()
        .filter(|(_, region)| region.contains_point(position))
        .map(|(index, _)| *index)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Runs every sensor, then applies the resulting transitions one at a time.
pub fn detect_chunk_entry(world: &mut World) {
    if !world.contains_resource::<LevelStreamer>() {
        return;
    }

    let triggers: Vec<(i32, Aabb)> = world
        .query::<(&ChunkInstance, &ChunkTrigger)>()
        .iter(world)
        .map(|(instance, trigger)| (instance.logical_index, trigger.region))
        .collect();

    let mut transitions = Vec::new();
    let mut sensors = world.query::<(&Transform, &mut ChunkEntrySensor)>();
    for (transform, mut sensor) in sensors.iter_mut(world) {
        if let Some(entry) = sensor.register() {
            transitions.push(entry);
            continue;
        }
        let overlapped = overlapped_indices(transform.translation, &triggers);
        if let Some(entry) = sensor.observe(&overlapped) {
            transitions.push(entry);
        }
    }

    if transitions.is_empty() {
        return;
    }

    world.resource_scope(|world, mut streamer: Mut<LevelStreamer>| {
        let mut scene = SceneWorld::new(world);
        for entry in transitions {
            debug!("Sensor reported chunk {} -> {}", entry.previous_index, entry.new_index);
            streamer.on_player_entered_chunk(&mut scene, entry.new_index, entry.previous_index);
        }
    });
}
