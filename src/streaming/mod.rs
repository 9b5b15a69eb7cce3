pub mod chunk;
pub mod events;
pub mod plugin;
pub mod scene;
pub mod selector;
pub mod streamer;
pub mod window;
pub mod world;

pub use chunk::{Chunk, ChunkPair, Direction};
pub use events::{ChunkEntered, ChunkEntryListener, ListenerId};
pub use plugin::{StreamingPlugin, StreamingSet};
pub use scene::{ChunkInstance, ChunkTrigger, SceneWorld};
pub use selector::{PrototypeSelector, SequentialSelector, UniformSelector};
pub use streamer::{LevelStreamer, RangeBounds, SlideOutcome};
pub use window::ChunkWindow;
pub use world::{PlacedChunk, SpawnError, SpawnRequest, WorldAdapter};
