use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::EXCLUDED_PART_KEYWORDS;
use crate::geometry::aabb::Aabb;

/// One piece of content a chunk prototype is built from, in chunk-local space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrototypePart {
    pub name: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
    /// Parts without collision (decals, lights, foliage) never shape the chunk bounds
    #[serde(default = "default_collision")]
    pub collision: bool,
}

fn default_collision() -> bool {
    true
}

impl PrototypePart {
    pub fn new(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            name: name.into(),
            center: center.to_array(),
            half_extents: half_extents.to_array(),
            collision: true,
        }
    }

    pub fn without_collision(mut self) -> Self {
        self.collision = false;
        self
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec3::from_array(self.center), Vec3::from_array(self.half_extents))
    }

    /// Stairs and steps overhang the chunk walls and would break tiling.
    fn shapes_bounds(&self) -> bool {
        if !self.collision {
            return false;
        }
        let name = self.name.to_lowercase();
        !EXCLUDED_PART_KEYWORDS.iter().any(|keyword| name.contains(keyword))
    }
}

/// A kind of chunk the streamer can place.
///
/// Chunk content extends from the chunk origin along the travel axis, so a
/// prototype without explicit parts occupies `[0, 2 * half_extents.x]` on X
/// and is centred on the other two axes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkPrototype {
    pub name: String,
    pub half_extents: [f32; 3],
    #[serde(default)]
    pub parts: Vec<PrototypePart>,
}

impl ChunkPrototype {
    pub fn new(name: impl Into<String>, half_extents: Vec3) -> Self {
        Self {
            name: name.into(),
            half_extents: half_extents.to_array(),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: PrototypePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Bounds of the unplaced prototype in chunk-local space.
    pub fn local_bounds(&self) -> Aabb {
        let measured = Aabb::union_all(
            self.parts
                .iter()
                .filter(|part| part.shapes_bounds())
                .map(PrototypePart::bounds),
        );

        measured.unwrap_or_else(|| {
            let half = Vec3::from_array(self.half_extents);
            Aabb::new(Vec3::new(half.x, 0.0, 0.0), half)
        })
    }

    /// Half-size of the prototype before it is placed in the world.
    pub fn nominal_half_extents(&self) -> Vec3 {
        self.local_bounds().half_extents
    }
}
