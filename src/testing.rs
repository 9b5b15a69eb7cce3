//! Test doubles shared by the unit tests.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use crate::config::{PrototypeSelection, StreamerConfig};
use crate::geometry::{Aabb, ChunkPrototype};
use crate::navigation::NavigationIndex;
use crate::streaming::{
    ChunkEntered, ChunkEntryListener, ChunkInstance, LevelStreamer, PlacedChunk, SceneWorld, SpawnError,
    SpawnRequest, WorldAdapter,
};

pub fn corridor_prototype() -> ChunkPrototype {
    ChunkPrototype::new("corridor", Vec3::new(100.0, 150.0, 250.0))
}

/// One 200-unit corridor prototype, picked in order.
pub fn corridor_config(buffer_count: u32) -> StreamerConfig {
    StreamerConfig::new(vec![corridor_prototype()], buffer_count).with_selection(PrototypeSelection::Sequential)
}

pub fn streamer_with(config: StreamerConfig, world: &mut FlakyWorld) -> LevelStreamer {
    let mut streamer = LevelStreamer::new(config);
    streamer.initialize(world).unwrap();
    streamer
}

/// Real Bevy world whose spawns fail on demand.
#[derive(Default)]
pub struct FlakyWorld {
    pub world: World,
    attempts: usize,
    failing_attempts: Vec<usize>,
    fail_next: usize,
}

impl FlakyWorld {
    /// Fails the given spawn attempts, counted from zero across primaries and mirrors.
    pub fn failing_on(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing_attempts: attempts.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn fail_next_spawns(&mut self, count: usize) {
        self.fail_next = count;
    }

    /// Live (primary, mirror) chunk entities.
    pub fn instance_counts(&mut self) -> (usize, usize) {
        let mut query = self.world.query::<&ChunkInstance>();
        query.iter(&self.world).fold((0, 0), |(primaries, mirrors), instance| {
            if instance.mirrored {
                (primaries, mirrors + 1)
            } else {
                (primaries + 1, mirrors)
            }
        })
    }
}

impl WorldAdapter for FlakyWorld {
    fn spawn_chunk(&mut self, request: &SpawnRequest<'_>) -> Result<PlacedChunk, SpawnError> {
        let attempt = self.attempts;
        self.attempts += 1;

        let forced = self.fail_next > 0;
        if forced {
            self.fail_next -= 1;
        }
        if forced || self.failing_attempts.contains(&attempt) {
            return Err(SpawnError::Rejected {
                prototype: request.prototype.name.clone(),
                logical_index: request.logical_index,
            });
        }
        SceneWorld::new(&mut self.world).spawn_chunk(request)
    }

    fn destroy_chunk(&mut self, entity: Entity) {
        SceneWorld::new(&mut self.world).destroy_chunk(entity);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NavCall {
    Resize { center: Vec3, extent: Vec3 },
    Invalidate(Aabb),
}

/// Navigation index that records every call it receives.
#[derive(Clone, Default)]
pub struct RecordingNavIndex {
    calls: Arc<Mutex<Vec<NavCall>>>,
}

impl RecordingNavIndex {
    pub fn calls(&self) -> Vec<NavCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl NavigationIndex for RecordingNavIndex {
    fn resize_region(&mut self, center: Vec3, extent: Vec3) {
        self.calls.lock().unwrap().push(NavCall::Resize { center, extent });
    }

    fn invalidate_region(&mut self, bounds: Aabb) {
        self.calls.lock().unwrap().push(NavCall::Invalidate(bounds));
    }
}

pub struct ReceivedEntry {
    pub event: ChunkEntered,
    /// Window indices at the time of delivery
    pub window: Vec<i32>,
}

pub struct RecordingListener {
    name: &'static str,
    pub events: Vec<ReceivedEntry>,
    order: Option<Arc<Mutex<Vec<&'static str>>>>,
}

impl RecordingListener {
    pub fn shared(name: &'static str) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            name,
            events: Vec::new(),
            order: None,
        }))
    }

    /// Also appends its name to `order` on every delivery.
    pub fn sharing(name: &'static str, order: Arc<Mutex<Vec<&'static str>>>) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            name,
            events: Vec::new(),
            order: Some(order),
        }))
    }
}

impl ChunkEntryListener for RecordingListener {
    fn on_player_entered_chunk(&mut self, event: ChunkEntered, streamer: &LevelStreamer) {
        self.events.push(ReceivedEntry {
            event,
            window: streamer.window().indices().collect(),
        });
        if let Some(order) = &self.order {
            order.lock().unwrap().push(self.name);
        }
    }
}
