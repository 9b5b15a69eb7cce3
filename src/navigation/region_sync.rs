use bevy::prelude::*;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::NavSyncConfig;
use crate::geometry::Aabb;
use crate::navigation::index::NavigationIndex;
use crate::streaming::{ChunkEntered, ChunkEntryListener, LevelStreamer, ListenerId};

#[derive(Error, Debug, PartialEq)]
pub enum NavSyncError {
    #[error("no chunk bounds available around chunk {center} (buffer {buffer})")]
    NoBoundsAvailable { center: i32, buffer: u32 },
    #[error("degenerate nav bounds around chunk {center}: {bounds:?}")]
    DegenerateBounds { center: i32, bounds: Aabb },
    #[error("nav region sync is already attached to a level streamer")]
    AlreadyAttached,
    #[error("nav region sync is not attached to a level streamer")]
    NotAttached,
    #[error("nav region sync lock poisoned")]
    Poisoned,
}

/// Keeps an external navigation index sized to the chunks around the player.
///
/// Holds no reference to the streamer: it is handed one read-only on every
/// chunk-entry broadcast, and explicitly on attach/detach.
pub struct NavRegionSync {
    center_index: i32,
    buffer_size: u32,
    current_bounds: Option<Aabb>,
    index: Box<dyn NavigationIndex>,
    subscription: Option<ListenerId>,
}

impl NavRegionSync {
    pub fn new(config: &NavSyncConfig, index: Box<dyn NavigationIndex>) -> Self {
        Self {
            center_index: 0,
            buffer_size: config.buffer_size,
            current_bounds: None,
            index,
            subscription: None,
        }
    }

    pub fn center_index(&self) -> i32 {
        self.center_index
    }

    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }

    pub fn current_bounds(&self) -> Option<Aabb> {
        self.current_bounds
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes to chunk-entry events and covers the streamer's current center.
    ///
    /// The subscription stays in place even if the initial update fails.
    pub fn attach(sync: &Arc<Mutex<Self>>, streamer: &mut LevelStreamer) -> Result<Aabb, NavSyncError> {
        let mut this = sync.lock().map_err(|_| NavSyncError::Poisoned)?;
        if this.subscription.is_some() {
            return Err(NavSyncError::AlreadyAttached);
        }
        this.subscription = Some(streamer.subscribe(sync));
        this.center_index = streamer.center_index();
        info!("Nav region sync attached at chunk {}", this.center_index);

        let (center, buffer) = (this.center_index, this.buffer_size);
        this.recompute_and_apply(streamer, center, buffer)
    }

    pub fn detach(&mut self, streamer: &mut LevelStreamer) -> Result<(), NavSyncError> {
        let id = self.subscription.take().ok_or(NavSyncError::NotAttached)?;
        if !streamer.unsubscribe(id) {
            warn!("Nav region sync subscription {:?} was already gone", id);
        }
        info!("Nav region sync detached");
        Ok(())
    }

    /// Pushes the bounds of chunks `[center - buffer, center + buffer]` to the index.
    ///
    /// Always resizes and invalidates, even when the bounds did not change;
    /// the index treats a repeated region as a no-op.
    pub fn recompute_and_apply(
        &mut self,
        streamer: &LevelStreamer,
        center: i32,
        buffer: u32,
    ) -> Result<Aabb, NavSyncError> {
        let range = streamer
            .range_bounds(center, buffer)
            .ok_or(NavSyncError::NoBoundsAvailable { center, buffer })?;
        let bounds = range.aabb();
        if !bounds.is_valid() {
            return Err(NavSyncError::DegenerateBounds { center, bounds });
        }
        if range.is_estimate() {
            info!("Nav region around chunk {} is estimated from chunk spacing", center);
        }

        self.index.resize_region(bounds.center, bounds.half_extents);
        self.index.invalidate_region(bounds);
        self.current_bounds = Some(bounds);

        info!(
            "Nav region updated - center: {:?}, extent: {:?}",
            bounds.center, bounds.half_extents
        );
        Ok(bounds)
    }
}

impl ChunkEntryListener for NavRegionSync {
    fn on_player_entered_chunk(&mut self, event: ChunkEntered, streamer: &LevelStreamer) {
        self.center_index = event.new_index;
        let (center, buffer) = (self.center_index, self.buffer_size);
        if let Err(err) = self.recompute_and_apply(streamer, center, buffer) {
            warn!("Nav region update skipped: {}", err);
        }
    }
}

impl Drop for NavRegionSync {
    fn drop(&mut self) {
        if let Some(id) = self.subscription {
            warn!("Nav region sync dropped while still subscribed as {:?}", id);
        }
    }
}
