use bevy::prelude::*;

use crate::constants::TRIGGER_LATERAL_HALF_EXTENT;
use crate::geometry::Aabb;
use crate::streaming::world::{PlacedChunk, SpawnError, SpawnRequest, WorldAdapter};

#[derive(Component, Clone, Debug)]
pub struct ChunkInstance {
    pub logical_index: i32,
    pub prototype: String,
    pub mirrored: bool,
}

/// World-space region that reports the player entering this chunk.
#[derive(Component, Clone, Copy, Debug)]
pub struct ChunkTrigger {
    pub region: Aabb,
}

impl ChunkTrigger {
    /// Matches the chunk on the travel and vertical axes, fixed width laterally.
    pub fn around(bounds: &Aabb) -> Self {
        Self {
            region: Aabb::new(
                bounds.center,
                Vec3::new(bounds.half_extents.x, bounds.half_extents.y, TRIGGER_LATERAL_HALF_EXTENT),
            ),
        }
    }
}

/// [`WorldAdapter`] that spawns chunk entities straight into a Bevy [`World`].
pub struct SceneWorld<'w> {
    world: &'w mut World,
}

impl<'w> SceneWorld<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl WorldAdapter for SceneWorld<'_> {
    fn spawn_chunk(&mut self, request: &SpawnRequest<'_>) -> Result<PlacedChunk, SpawnError> {
        let bounds = request.prototype.local_bounds().transformed(&request.transform);
        if !bounds.is_valid() {
            return Err(SpawnError::DegenerateGeometry {
                prototype: request.prototype.name.clone(),
                logical_index: request.logical_index,
            });
        }

        let entity = self
            .world
            .spawn((
                Name::new(request.label.clone()),
                request.transform,
                ChunkInstance {
                    logical_index: request.logical_index,
                    prototype: request.prototype.name.clone(),
                    mirrored: request.mirrored,
                },
                ChunkTrigger::around(&bounds),
            ))
            .id();

        Ok(PlacedChunk { entity, bounds })
    }

    fn destroy_chunk(&mut self, entity: Entity) {
        if self.world.entities().contains(entity) {
            self.world.despawn(entity);
        } else {
            warn!("Chunk entity {:?} already gone before eviction", entity);
        }
    }
}
