use bevy::prelude::*;
use std::sync::{Arc, Mutex, PoisonError};

use crate::geometry::Aabb;

/// External navigation index the nav region is pushed to.
///
/// Both calls must be safe to repeat with the same arguments.
pub trait NavigationIndex: Send {
    /// Move and resize the bounding volume that limits navigation generation.
    fn resize_region(&mut self, center: Vec3, extent: Vec3);

    /// Request a rebuild of exactly `bounds`.
    fn invalidate_region(&mut self, bounds: Aabb);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavRegion {
    pub center: Vec3,
    pub extent: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavFeedState {
    /// Latest region, kept until the next resize
    pub region: Option<NavRegion>,
    /// Regions invalidated since the last drain
    pub invalidated: Vec<Aabb>,
}

/// [`NavigationIndex`] that hands updates over to Bevy systems.
///
/// The nav sync writes into it from inside a chunk-entry broadcast; systems
/// drain it afterwards to move the bounds volume entity.
#[derive(Resource, Clone, Default)]
pub struct NavVolumeFeed {
    state: Arc<Mutex<NavFeedState>>,
}

impl NavVolumeFeed {
    pub fn region(&self) -> Option<NavRegion> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).region
    }

    pub fn drain(&self) -> NavFeedState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        NavFeedState {
            region: state.region,
            invalidated: std::mem::take(&mut state.invalidated),
        }
    }
}

impl NavigationIndex for NavVolumeFeed {
    fn resize_region(&mut self, center: Vec3, extent: Vec3) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.region = Some(NavRegion { center, extent });
    }

    fn invalidate_region(&mut self, bounds: Aabb) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.invalidated.push(bounds);
    }
}
