use bevy::prelude::*;
use thiserror::Error;

use crate::geometry::{Aabb, ChunkPrototype};

#[derive(Clone, Debug)]
pub struct SpawnRequest<'a> {
    pub prototype: &'a ChunkPrototype,
    pub logical_index: i32,
    pub transform: Transform,
    pub mirrored: bool,
    pub label: String,
}

/// A chunk the host has placed, with bounds measured after placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedChunk {
    pub entity: Entity,
    pub bounds: Aabb,
}

#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("world refused to spawn '{prototype}' for chunk {logical_index}")]
    Rejected { prototype: String, logical_index: i32 },
    #[error("'{prototype}' produced degenerate bounds for chunk {logical_index}")]
    DegenerateGeometry { prototype: String, logical_index: i32 },
}

/// Scene operations the level streamer needs from its host.
pub trait WorldAdapter {
    fn spawn_chunk(&mut self, request: &SpawnRequest<'_>) -> Result<PlacedChunk, SpawnError>;

    fn destroy_chunk(&mut self, entity: Entity);
}
