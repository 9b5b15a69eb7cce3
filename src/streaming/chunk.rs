use bevy::prelude::*;

use crate::geometry::Aabb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Moving to a higher logical index is forward, anything else backward.
    pub fn of_travel(new_index: i32, previous_index: i32) -> Self {
        if new_index > previous_index {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub fn step(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A spawned chunk: one entity with its logical index and measured world bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    logical_index: i32,
    entity: Entity,
    location: Vec3,
    bounds: Aabb,
}

impl Chunk {
    pub fn new(logical_index: i32, entity: Entity, location: Vec3, bounds: Aabb) -> Self {
        Self {
            logical_index,
            entity,
            location,
            bounds,
        }
    }

    pub fn logical_index(&self) -> i32 {
        self.logical_index
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Placement origin (not the bounds center).
    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// A primary chunk and its mirrored twin. Always created and destroyed together.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkPair {
    primary: Chunk,
    mirror: Chunk,
    extents: Vec3,
    prototype: String,
}

impl ChunkPair {
    pub fn new(primary: Chunk, mirror: Chunk, extents: Vec3, prototype: impl Into<String>) -> Self {
        debug_assert_eq!(primary.logical_index, mirror.logical_index);
        Self {
            primary,
            mirror,
            extents,
            prototype: prototype.into(),
        }
    }

    pub fn logical_index(&self) -> i32 {
        self.primary.logical_index
    }

    pub fn primary(&self) -> &Chunk {
        &self.primary
    }

    pub fn mirror(&self) -> &Chunk {
        &self.mirror
    }

    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    pub fn bounds(&self) -> Aabb {
        self.primary.bounds.union(&self.mirror.bounds)
    }
}
