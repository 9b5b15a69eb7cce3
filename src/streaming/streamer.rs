use bevy::prelude::*;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

use crate::config::{ConfigError, StreamerConfig};
use crate::constants::{LATERAL_AXIS, MIRROR_NAME_SUFFIX, TRAVEL_AXIS};
use crate::geometry::Aabb;
use crate::streaming::chunk::{Chunk, ChunkPair, Direction};
use crate::streaming::events::{ChunkEntered, ChunkEntryListener, ListenerId, ListenerList};
use crate::streaming::selector::{PrototypeSelector, selector_for};
use crate::streaming::window::ChunkWindow;
use crate::streaming::world::{SpawnRequest, WorldAdapter};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeBounds {
    /// Union of the measured bounds of active chunk pairs in range
    Measured(Aabb),
    /// No active chunk in range: extrapolated from one reference chunk
    /// assuming uniform spacing along the travel axis. An approximation,
    /// not real geometry.
    Estimated(Aabb),
}

impl RangeBounds {
    pub fn aabb(&self) -> Aabb {
        match self {
            RangeBounds::Measured(aabb) | RangeBounds::Estimated(aabb) => *aabb,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, RangeBounds::Estimated(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlideOutcome {
    /// Same chunk as before, nothing changed and nothing was broadcast
    Unchanged,
    /// One pair out and one in, more while healing a short window
    Slid {
        evicted: Vec<i32>,
        spawned: Vec<i32>,
    },
    /// Not initialized, or the index is not adjacent to the window
    Rejected,
}

/// Streams chunk pairs around the player and owns the active window.
#[derive(Resource)]
pub struct LevelStreamer {
    config: StreamerConfig,
    window: ChunkWindow,
    center_index: i32,
    selector: Box<dyn PrototypeSelector>,
    listeners: ListenerList,
    initialized: bool,
}

impl LevelStreamer {
    pub fn new(config: StreamerConfig) -> Self {
        let selector = selector_for(&config.selection);
        Self {
            config,
            window: ChunkWindow::new(),
            center_index: 0,
            selector,
            listeners: ListenerList::default(),
            initialized: false,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn PrototypeSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    pub fn window(&self) -> &ChunkWindow {
        &self.window
    }

    pub fn center_index(&self) -> i32 {
        self.center_index
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Spawns the center pair then `buffer_count` pairs on either side.
    pub fn initialize(&mut self, world: &mut dyn WorldAdapter) -> Result<(), ConfigError> {
        if self.initialized {
            warn!("Level streamer already initialized, ignoring");
            return Ok(());
        }
        if self.config.prototypes.is_empty() {
            return Err(ConfigError::NoPrototypes);
        }
        if self.config.buffer_count == 0 {
            return Err(ConfigError::InvalidBufferCount(0));
        }

        self.center_index = 0;
        self.spawn_pair(world, Direction::Forward, 0);
        for _ in 0..self.config.buffer_count {
            self.spawn_pair(world, Direction::Forward, 0);
            self.spawn_pair(world, Direction::Backward, 0);
        }
        self.initialized = true;

        info!(
            "Level streamer initialized with {} of {} chunk pairs ({:?})",
            self.window.len(),
            self.config.window_width(),
            self.window.index_range()
        );
        Ok(())
    }

    /// Slides the window one pair toward `new_index` and broadcasts the change.
    /// A window left short by a failed spawn is rebuilt around `new_index` instead.
    ///
    /// Order is fixed: evict, spawn, update the center, then notify listeners,
    /// so listeners always observe a finished window.
    pub fn on_player_entered_chunk(
        &mut self,
        world: &mut dyn WorldAdapter,
        new_index: i32,
        previous_index: i32,
    ) -> SlideOutcome {
        if !self.initialized {
            warn!("Chunk entry {} -> {} before initialization", previous_index, new_index);
            return SlideOutcome::Rejected;
        }
        if new_index == self.center_index || new_index == previous_index {
            debug!("Re-entered chunk {}, window unchanged", new_index);
            return SlideOutcome::Unchanged;
        }
        if let Some(range) = self.window.index_range() {
            if new_index < range.start() - 1 || new_index > range.end() + 1 {
                warn!(
                    "Chunk {} is not adjacent to the active window {:?}, ignoring",
                    new_index, range
                );
                return SlideOutcome::Rejected;
            }
        }

        info!("Player entered chunk index: {} -> {}", previous_index, new_index);

        let event = ChunkEntered {
            new_index,
            previous_index,
        };
        let leading = event.direction();
        let mut evicted = Vec::new();
        let mut spawned = Vec::new();
        if self.window.len() >= self.config.window_width() {
            evicted.extend(self.despawn_extremity(world, leading.opposite()));
            spawned.extend(self.spawn_pair(world, leading, new_index));
        } else {
            debug!(
                "Window holds {} of {} pairs, healing around chunk {}",
                self.window.len(),
                self.config.window_width(),
                new_index
            );
            self.heal_around(world, new_index, leading, &mut evicted, &mut spawned);
        }

        self.center_index = new_index;
        self.broadcast(event);

        SlideOutcome::Slid { evicted, spawned }
    }

    /// Bounds of every active pair with index in `[center - buffer, center + buffer]`.
    pub fn range_bounds(&self, center_index: i32, buffer_size: u32) -> Option<RangeBounds> {
        let buffer = i32::try_from(buffer_size).unwrap_or(i32::MAX);
        let start = center_index.saturating_sub(buffer);
        let end = center_index.saturating_add(buffer);

        let measured = Aabb::union_all(self.window.in_range(start, end).map(ChunkPair::bounds));
        if let Some(aabb) = measured {
            return Some(RangeBounds::Measured(aabb));
        }

        let reference = self.window.iter().next()?;
        let extent = reference.extents();
        let chunk_width = extent.x * 2.0;
        let start_x = start as f32 * chunk_width;
        let end_x = end as f32 * chunk_width;

        debug!(
            "No active chunk in [{}, {}], estimating bounds from chunk {}",
            start,
            end,
            reference.logical_index()
        );
        Some(RangeBounds::Estimated(Aabb::from_min_max(
            Vec3::new(start_x - extent.x, -extent.y, -extent.z),
            Vec3::new(end_x + extent.x, extent.y, extent.z),
        )))
    }

    pub fn subscribe<L: ChunkEntryListener + 'static>(&mut self, listener: &Arc<Mutex<L>>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Destroys every active pair. The streamer can be initialized again afterwards.
    pub fn shutdown(&mut self, world: &mut dyn WorldAdapter) {
        let mut destroyed = 0;
        for pair in self.window.drain() {
            world.destroy_chunk(pair.primary().entity());
            world.destroy_chunk(pair.mirror().entity());
            destroyed += 1;
        }
        if !self.listeners.is_empty() {
            warn!(
                "Level streamer shut down with {} listener(s) still subscribed",
                self.listeners.len()
            );
        }
        self.initialized = false;
        self.center_index = 0;
        info!("Level streamer shut down, destroyed {} chunk pairs", destroyed);
    }

    fn broadcast(&mut self, event: ChunkEntered) {
        let dropped = self.listeners.broadcast(event, self);
        if !dropped.is_empty() {
            self.listeners.prune(&dropped);
        }
    }

    // Rebuilds a short window as [center - buffer, center + buffer], stopping
    // on a side at its first failed spawn
    fn heal_around(
        &mut self,
        world: &mut dyn WorldAdapter,
        center: i32,
        leading: Direction,
        evicted: &mut Vec<i32>,
        spawned: &mut Vec<i32>,
    ) {
        let buffer = self.buffer_reach();
        for direction in [leading.opposite(), leading] {
            while self.reach(direction, center).is_some_and(|reach| reach > buffer) {
                match self.despawn_extremity(world, direction) {
                    Some(index) => evicted.push(index),
                    None => break,
                }
            }
        }
        for direction in [leading, leading.opposite()] {
            while self.reach(direction, center).is_none_or(|reach| reach < buffer) {
                match self.spawn_pair(world, direction, center) {
                    Some(index) => spawned.push(index),
                    None => break,
                }
            }
        }
    }

    fn buffer_reach(&self) -> i32 {
        i32::try_from(self.config.buffer_count).unwrap_or(i32::MAX)
    }

    // Pairs past `center` toward `direction`; negative when the edge lags behind it
    fn reach(&self, direction: Direction, center: i32) -> Option<i32> {
        let edge = self.window.extremity(direction)?;
        Some((edge.logical_index() - center) * direction.step())
    }

    fn despawn_extremity(&mut self, world: &mut dyn WorldAdapter, direction: Direction) -> Option<i32> {
        let pair = self.window.evict(direction)?;
        world.destroy_chunk(pair.primary().entity());
        world.destroy_chunk(pair.mirror().entity());
        debug!("Evicted chunk pair {}", pair.logical_index());
        Some(pair.logical_index())
    }

    // `anchor_index` is only used when the window is empty
    fn spawn_pair(&mut self, world: &mut dyn WorldAdapter, direction: Direction, anchor_index: i32) -> Option<i32> {
        let choice = self.selector.select(self.config.prototypes.len());
        let Some(prototype) = self.config.prototypes.get(choice) else {
            warn!(
                "Prototype selector picked {} of {} prototypes, pair not spawned",
                choice,
                self.config.prototypes.len()
            );
            return None;
        };
        let own_extent = prototype.nominal_half_extents();

        let (logical_index, location) = match self.window.extremity(direction) {
            Some(edge) => {
                let offset = match direction {
                    Direction::Forward => edge.extents().x * 2.0,
                    Direction::Backward => -own_extent.x * 2.0,
                };
                (
                    edge.logical_index() + direction.step(),
                    edge.primary().location() + TRAVEL_AXIS * offset,
                )
            }
            None => (
                anchor_index,
                TRAVEL_AXIS * (anchor_index as f32 * own_extent.x * 2.0),
            ),
        };

        let label = format!("{}_{}", prototype.name, logical_index);
        let primary_request = SpawnRequest {
            prototype,
            logical_index,
            transform: Transform::from_translation(location),
            mirrored: false,
            label: label.clone(),
        };
        let primary = match world.spawn_chunk(&primary_request) {
            Ok(placed) => placed,
            Err(err) => {
                warn!("Chunk {} not spawned, window left short: {}", logical_index, err);
                return None;
            }
        };

        let extents = primary.bounds.half_extents;
        let mirror_location = location + TRAVEL_AXIS * (extents.x * 2.0) + LATERAL_AXIS * self.config.mirror_offset;
        let mirror_request = SpawnRequest {
            prototype,
            logical_index,
            transform: Transform::from_translation(mirror_location).with_rotation(Quat::from_rotation_y(PI)),
            mirrored: true,
            label: format!("{}{}", label, MIRROR_NAME_SUFFIX),
        };
        let mirror = match world.spawn_chunk(&mirror_request) {
            Ok(placed) => placed,
            Err(err) => {
                // Pairs live and die together
                world.destroy_chunk(primary.entity);
                warn!("Mirror of chunk {} not spawned, pair dropped: {}", logical_index, err);
                return None;
            }
        };

        let pair = ChunkPair::new(
            Chunk::new(logical_index, primary.entity, location, primary.bounds),
            Chunk::new(logical_index, mirror.entity, mirror_location, mirror.bounds),
            extents,
            prototype.name.clone(),
        );
        self.window.push(direction, pair);
        debug!("Spawned chunk pair {} at {:?}", logical_index, location);
        Some(logical_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NO_PREVIOUS_CHUNK;
    use crate::geometry::ChunkPrototype;
    use crate::testing::{FlakyWorld, RecordingListener, corridor_config, streamer_with};

    fn indices(streamer: &LevelStreamer) -> Vec<i32> {
        streamer.window().indices().collect()
    }

    #[test]
    fn initial_window_is_centered_and_contiguous() {
        let mut world = FlakyWorld::default();
        let streamer = streamer_with(corridor_config(2), &mut world);

        assert_eq!(indices(&streamer), vec![-2, -1, 0, 1, 2]);
        assert_eq!(streamer.window().len(), 5);
        assert!(streamer.window().is_contiguous());
        assert_eq!(streamer.center_index(), 0);
        assert_eq!(world.instance_counts(), (5, 5));
    }

    #[test]
    fn empty_prototype_list_fails_initialization() {
        let mut world = FlakyWorld::default();
        let mut streamer = LevelStreamer::new(StreamerConfig::new(Vec::new(), 1));

        let result = streamer.initialize(&mut world);

        assert!(matches!(result, Err(ConfigError::NoPrototypes)));
        assert!(!streamer.is_initialized());
        assert_eq!(world.instance_counts(), (0, 0));
    }

    #[test]
    fn entering_next_chunk_slides_one_pair() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let listener = RecordingListener::shared("nav");
        streamer.subscribe(&listener);
        assert_eq!(indices(&streamer), vec![-1, 0, 1]);

        let outcome = streamer.on_player_entered_chunk(&mut world, 2, 1);

        assert_eq!(
            outcome,
            SlideOutcome::Slid {
                evicted: vec![-1],
                spawned: vec![2]
            }
        );
        assert_eq!(indices(&streamer), vec![0, 1, 2]);
        assert_eq!(streamer.center_index(), 2);

        let log = listener.lock().unwrap();
        assert_eq!(log.events.len(), 1);
        assert_eq!(
            log.events[0].event,
            ChunkEntered {
                new_index: 2,
                previous_index: 1
            }
        );
        // Listeners observe the finished window
        assert_eq!(log.events[0].window, vec![0, 1, 2]);
    }

    #[test]
    fn re_entering_the_same_chunk_is_a_no_op() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let listener = RecordingListener::shared("nav");
        streamer.subscribe(&listener);

        assert_eq!(
            streamer.on_player_entered_chunk(&mut world, 0, NO_PREVIOUS_CHUNK),
            SlideOutcome::Unchanged
        );

        for index in 1..=5 {
            streamer.on_player_entered_chunk(&mut world, index, index - 1);
        }
        let before: Vec<_> = streamer.window().iter().cloned().collect();
        let events_before = listener.lock().unwrap().events.len();

        assert_eq!(streamer.on_player_entered_chunk(&mut world, 5, 5), SlideOutcome::Unchanged);
        assert_eq!(streamer.on_player_entered_chunk(&mut world, 5, 4), SlideOutcome::Unchanged);

        let after: Vec<_> = streamer.window().iter().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(listener.lock().unwrap().events.len(), events_before);
        assert_eq!(streamer.center_index(), 5);
    }

    #[test]
    fn same_index_report_from_sensor_is_ignored() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);

        assert_eq!(streamer.on_player_entered_chunk(&mut world, 1, 1), SlideOutcome::Unchanged);
        assert_eq!(indices(&streamer), vec![-1, 0, 1]);
        assert_eq!(streamer.center_index(), 0);
    }

    #[test]
    fn new_pairs_extend_the_extremity_in_travel_direction() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(2), &mut world);

        for index in 1..=6 {
            let highest = streamer.window().highest_index().unwrap();
            match streamer.on_player_entered_chunk(&mut world, index, index - 1) {
                SlideOutcome::Slid { spawned, .. } => assert_eq!(spawned, vec![highest + 1]),
                other => panic!("expected a slide, got {other:?}"),
            }
            assert!(streamer.window().is_contiguous());
            assert_eq!(streamer.window().len(), 5);
        }

        for index in (0..6).rev() {
            let lowest = streamer.window().lowest_index().unwrap();
            match streamer.on_player_entered_chunk(&mut world, index, index + 1) {
                SlideOutcome::Slid { spawned, .. } => assert_eq!(spawned, vec![lowest - 1]),
                other => panic!("expected a slide, got {other:?}"),
            }
            assert!(streamer.window().is_contiguous());
        }

        assert_eq!(indices(&streamer), vec![-2, -1, 0, 1, 2]);
        assert_eq!(world.instance_counts(), (5, 5));
    }

    #[test]
    fn pairs_tile_without_gaps_and_mirror_is_offset() {
        let mut world = FlakyWorld::default();
        let config = StreamerConfig::new(
            vec![
                ChunkPrototype::new("long", Vec3::new(100.0, 150.0, 250.0)),
                ChunkPrototype::new("short", Vec3::new(40.0, 150.0, 250.0)),
            ],
            2,
        )
        .with_mirror_offset(500.0)
        .with_selection(crate::config::PrototypeSelection::Sequential);
        let mut streamer = streamer_with(config, &mut world);
        streamer.on_player_entered_chunk(&mut world, 1, 0);
        streamer.on_player_entered_chunk(&mut world, 0, 1);
        streamer.on_player_entered_chunk(&mut world, -1, 0);

        let pairs: Vec<_> = streamer.window().iter().collect();
        for (left, right) in pairs.iter().zip(pairs.iter().skip(1)) {
            let gap = right.primary().bounds().min().x - left.primary().bounds().max().x;
            assert!(gap.abs() < 1e-3, "gap of {gap} between {} and {}", left.logical_index(), right.logical_index());
        }

        for pair in &pairs {
            let primary = pair.primary().bounds();
            let mirror = pair.mirror().bounds();
            assert_eq!(pair.primary().logical_index(), pair.mirror().logical_index());
            assert!((mirror.min().x - primary.min().x).abs() < 1e-3);
            assert!((mirror.max().x - primary.max().x).abs() < 1e-3);
            assert!((mirror.center.z - primary.center.z - 500.0).abs() < 1e-3);
        }
    }

    #[test]
    fn first_pair_sits_at_origin() {
        let mut world = FlakyWorld::default();
        let streamer = streamer_with(corridor_config(1), &mut world);

        let center = streamer.window().get(0).unwrap();
        assert_eq!(center.primary().location(), Vec3::ZERO);
        assert_eq!(streamer.window().get(1).unwrap().primary().location(), Vec3::new(200.0, 0.0, 0.0));
        assert_eq!(streamer.window().get(-1).unwrap().primary().location(), Vec3::new(-200.0, 0.0, 0.0));
        assert_eq!(center.extents(), Vec3::new(100.0, 150.0, 250.0));
        assert_eq!(center.prototype(), "corridor");
    }

    #[test]
    fn range_bounds_without_the_far_chunk_cover_what_exists() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        streamer.on_player_entered_chunk(&mut world, 2, 1);
        assert!(!streamer.window().contains(3));

        let bounds = streamer.range_bounds(2, 1).unwrap();

        // Chunks 1 and 2 are measured; 3 does not exist yet
        assert!(!bounds.is_estimate());
        let aabb = bounds.aabb();
        assert!((aabb.min().x - 200.0).abs() < 1e-3);
        assert!((aabb.max().x - 600.0).abs() < 1e-3);
        assert!((aabb.min().z + 250.0).abs() < 1e-3);
        assert!((aabb.max().z - 750.0).abs() < 1e-3);
    }

    #[test]
    fn range_bounds_with_the_far_chunk_include_it() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(2), &mut world);
        streamer.on_player_entered_chunk(&mut world, 1, 0);
        streamer.on_player_entered_chunk(&mut world, 2, 1);
        assert!(streamer.window().contains(3));

        let bounds = streamer.range_bounds(2, 1).unwrap();

        assert!(!bounds.is_estimate());
        let aabb = bounds.aabb();
        assert!((aabb.min().x - 200.0).abs() < 1e-3);
        assert!((aabb.max().x - 800.0).abs() < 1e-3);
    }

    #[test]
    fn range_outside_the_window_falls_back_to_an_estimate() {
        let mut world = FlakyWorld::default();
        let streamer = streamer_with(corridor_config(1), &mut world);

        let bounds = streamer.range_bounds(50, 1).unwrap();

        assert!(bounds.is_estimate());
        assert_eq!(bounds.aabb().min(), Vec3::new(9700.0, -150.0, -250.0));
        assert_eq!(bounds.aabb().max(), Vec3::new(10300.0, 150.0, 250.0));
    }

    #[test]
    fn empty_window_has_no_range_bounds() {
        let streamer = LevelStreamer::new(corridor_config(1));
        assert!(streamer.range_bounds(0, 1).is_none());
    }

    #[test]
    fn range_bounds_cover_every_pair_in_range() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(3), &mut world);
        streamer.on_player_entered_chunk(&mut world, 1, 0);

        for center in -3..=5 {
            for buffer in 0..=3u32 {
                let Some(RangeBounds::Measured(aabb)) = streamer.range_bounds(center, buffer) else {
                    continue;
                };
                for pair in streamer.window().in_range(center - buffer as i32, center + buffer as i32) {
                    assert!(aabb.contains(&pair.primary().bounds()));
                    assert!(aabb.contains(&pair.mirror().bounds()));
                }
            }
        }
    }

    #[test]
    fn failed_mirror_drops_the_pair_and_a_later_slide_heals() {
        // Spawn attempts: center (0, 1), forward (2, 3), backward (4, 5)
        let mut world = FlakyWorld::failing_on([3]);
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let listener = RecordingListener::shared("nav");
        streamer.subscribe(&listener);

        assert_eq!(indices(&streamer), vec![-1, 0]);
        assert_eq!(world.instance_counts(), (2, 2));

        let outcome = streamer.on_player_entered_chunk(&mut world, 1, 0);

        assert_eq!(
            outcome,
            SlideOutcome::Slid {
                evicted: vec![-1],
                spawned: vec![1, 2]
            }
        );
        assert_eq!(indices(&streamer), vec![0, 1, 2]);
        assert_eq!(world.instance_counts(), (3, 3));
        assert_eq!(listener.lock().unwrap().events.len(), 1);

        streamer.on_player_entered_chunk(&mut world, 2, 1);
        assert_eq!(indices(&streamer), vec![1, 2, 3]);
    }

    #[test]
    fn failed_spawn_still_moves_the_center_and_broadcasts() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let listener = RecordingListener::shared("nav");
        streamer.subscribe(&listener);
        world.fail_next_spawns(1);

        let outcome = streamer.on_player_entered_chunk(&mut world, 1, 0);

        assert_eq!(
            outcome,
            SlideOutcome::Slid {
                evicted: vec![-1],
                spawned: vec![]
            }
        );
        assert_eq!(streamer.center_index(), 1);
        assert_eq!(indices(&streamer), vec![0, 1]);
        assert_eq!(listener.lock().unwrap().events.len(), 1);
        assert_eq!(world.instance_counts(), (2, 2));
    }

    #[test]
    fn healed_window_is_centered_on_the_player_again() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(2), &mut world);
        world.fail_next_spawns(1);

        streamer.on_player_entered_chunk(&mut world, 1, 0);
        assert_eq!(indices(&streamer), vec![-1, 0, 1, 2]);

        for index in 2..=6 {
            streamer.on_player_entered_chunk(&mut world, index, index - 1);
            assert_eq!(streamer.window().index_range(), Some(index - 2..=index + 2));
            assert!(streamer.window().is_contiguous());
        }

        assert_eq!(indices(&streamer), vec![4, 5, 6, 7, 8]);
        assert_eq!(world.instance_counts(), (5, 5));
    }

    #[test]
    fn turning_back_after_a_failure_heals_the_other_side() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(2), &mut world);
        world.fail_next_spawns(1);
        streamer.on_player_entered_chunk(&mut world, 1, 0);

        let outcome = streamer.on_player_entered_chunk(&mut world, 0, 1);

        assert_eq!(
            outcome,
            SlideOutcome::Slid {
                evicted: vec![],
                spawned: vec![-2]
            }
        );
        assert_eq!(streamer.window().index_range(), Some(-2..=2));
    }

    #[test]
    fn short_trailing_side_is_refilled_when_the_leading_side_is_full() {
        // Both backward primaries at startup fail (attempts 4 and 7)
        let mut world = FlakyWorld::failing_on([4, 7]);
        let mut streamer = streamer_with(corridor_config(2), &mut world);
        assert_eq!(indices(&streamer), vec![0, 1, 2]);

        let outcome = streamer.on_player_entered_chunk(&mut world, 1, 0);

        assert_eq!(
            outcome,
            SlideOutcome::Slid {
                evicted: vec![],
                spawned: vec![3, -1]
            }
        );
        assert_eq!(streamer.window().index_range(), Some(-1..=3));
        assert_eq!(world.instance_counts(), (5, 5));
    }

    #[test]
    fn out_of_range_selection_leaves_the_window_short() {
        struct Overshoot;
        impl PrototypeSelector for Overshoot {
            fn select(&mut self, count: usize) -> usize {
                count
            }
        }

        let mut world = FlakyWorld::default();
        let mut streamer = LevelStreamer::new(corridor_config(1)).with_selector(Box::new(Overshoot));

        assert!(streamer.initialize(&mut world).is_ok());
        assert!(streamer.window().is_empty());
        assert_eq!(streamer.config().window_width(), 3);
        assert_eq!(world.instance_counts(), (0, 0));
    }

    #[test]
    fn jumps_far_from_the_window_are_rejected() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);

        assert_eq!(streamer.on_player_entered_chunk(&mut world, 10, 0), SlideOutcome::Rejected);
        assert_eq!(indices(&streamer), vec![-1, 0, 1]);
        assert_eq!(streamer.center_index(), 0);
    }

    #[test]
    fn uninitialized_streamer_rejects_entries() {
        let mut world = FlakyWorld::default();
        let mut streamer = LevelStreamer::new(corridor_config(1));

        assert_eq!(streamer.on_player_entered_chunk(&mut world, 1, 0), SlideOutcome::Rejected);
        assert!(streamer.window().is_empty());
    }

    #[test]
    fn listeners_are_notified_in_subscription_order() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let first = RecordingListener::sharing("first", order.clone());
        let second = RecordingListener::sharing("second", order.clone());
        streamer.subscribe(&first);
        streamer.subscribe(&second);

        streamer.on_player_entered_chunk(&mut world, 1, 0);
        streamer.on_player_entered_chunk(&mut world, 2, 1);

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "first", "second"]);
    }

    #[test]
    fn unsubscribed_and_dropped_listeners_stop_receiving() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(1), &mut world);
        let kept = RecordingListener::shared("kept");
        let removed = RecordingListener::shared("removed");
        let dropped = RecordingListener::shared("dropped");
        streamer.subscribe(&kept);
        let removed_id = streamer.subscribe(&removed);
        streamer.subscribe(&dropped);

        assert!(streamer.unsubscribe(removed_id));
        assert!(!streamer.unsubscribe(removed_id));
        drop(dropped);
        streamer.on_player_entered_chunk(&mut world, 1, 0);

        assert_eq!(streamer.listener_count(), 1);
        assert_eq!(kept.lock().unwrap().events.len(), 1);
        assert!(removed.lock().unwrap().events.is_empty());
    }

    #[test]
    fn shutdown_destroys_every_pair() {
        let mut world = FlakyWorld::default();
        let mut streamer = streamer_with(corridor_config(2), &mut world);
        streamer.on_player_entered_chunk(&mut world, 1, 0);

        streamer.shutdown(&mut world);

        assert!(streamer.window().is_empty());
        assert!(!streamer.is_initialized());
        assert_eq!(world.instance_counts(), (0, 0));
    }
}
