pub mod index;
pub mod plugin;
pub mod region_sync;

pub use index::{NavFeedState, NavRegion, NavVolumeFeed, NavigationIndex};
pub use plugin::{NavBoundsVolume, NavDirtyRegions, NavRegionHandle, NavRegionPlugin, NavVolumeSettings};
pub use region_sync::{NavRegionSync, NavSyncError};
