use bevy::prelude::*;
use std::sync::{Arc, Mutex, Weak};

use crate::streaming::chunk::Direction;
use crate::streaming::streamer::LevelStreamer;

/// Broadcast after the window has finished sliding to a new center chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkEntered {
    pub new_index: i32,
    pub previous_index: i32,
}

impl ChunkEntered {
    pub fn direction(&self) -> Direction {
        Direction::of_travel(self.new_index, self.previous_index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receives chunk-entry events. The streamer is handed over read-only, so a
/// listener can query bounds but never mutate the window.
pub trait ChunkEntryListener: Send {
    fn on_player_entered_chunk(&mut self, event: ChunkEntered, streamer: &LevelStreamer);
}

type ListenerSlot = (ListenerId, Weak<Mutex<dyn ChunkEntryListener>>);

/// Subscribers in registration order. Holds no ownership over listeners.
#[derive(Default)]
pub(crate) struct ListenerList {
    next_id: u64,
    entries: Vec<ListenerSlot>,
}

impl ListenerList {
    pub fn subscribe<L: ChunkEntryListener + 'static>(&mut self, listener: &Arc<Mutex<L>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        let weak: Weak<Mutex<dyn ChunkEntryListener>> = Arc::downgrade(listener);
        self.entries.push((id, weak));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn broadcast(&self, event: ChunkEntered, streamer: &LevelStreamer) -> Vec<ListenerId> {
        let mut dropped = Vec::new();
        for (id, slot) in &self.entries {
            let Some(listener) = slot.upgrade() else {
                dropped.push(*id);
                continue;
            };
            match listener.lock() {
                Ok(mut listener) => listener.on_player_entered_chunk(event, streamer),
                Err(_) => warn!("Listener {:?} is poisoned, skipping chunk entry {:?}", id, event),
            }
        }
        dropped
    }

    pub fn prune(&mut self, dropped: &[ListenerId]) {
        for id in dropped {
            // Dropping a listener without unsubscribing is a leak in the caller
            warn!("Listener {:?} was dropped without unsubscribing, removing it", id);
            self.unsubscribe(*id);
        }
    }
}
