pub mod aabb;
pub mod prototype;

pub use aabb::Aabb;
pub use prototype::{ChunkPrototype, PrototypePart};
