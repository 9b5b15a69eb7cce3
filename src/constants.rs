use bevy::prelude::Vec3;

// Sensor bootstrap: "no previous chunk"
pub const NO_PREVIOUS_CHUNK: i32 = -1;

// Streaming defaults (overridden by config)
pub const DEFAULT_BUFFER_COUNT: u32 = 2;
pub const DEFAULT_MIRROR_OFFSET: f32 = 500.0;

// Navigation defaults (overridden by config)
pub const DEFAULT_NAV_BUFFER_SIZE: u32 = 2;
pub const DEFAULT_NAV_VOLUME_BASE_SIZE: f32 = 200.0;

// World axes (Y-up)
pub const TRAVEL_AXIS: Vec3 = Vec3::X;
pub const LATERAL_AXIS: Vec3 = Vec3::Z;

// Chunk trigger regions span this far either side of the chunk on the lateral axis
pub const TRIGGER_LATERAL_HALF_EXTENT: f32 = 500.0;

// Part names that never contribute to prototype bounds
pub const EXCLUDED_PART_KEYWORDS: [&str; 2] = ["stairs", "steps"];

pub const MIRROR_NAME_SUFFIX: &str = "_Mirror";
