use std::collections::VecDeque;
use std::ops::RangeInclusive;

use crate::streaming::chunk::{ChunkPair, Direction};

/// Active chunk pairs ordered by ascending, gap-free logical index.
#[derive(Debug, Default)]
pub struct ChunkWindow {
    pairs: VecDeque<ChunkPair>,
}

impl ChunkWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChunkPair> {
        self.pairs.iter()
    }

    pub fn indices(&self) -> impl DoubleEndedIterator<Item = i32> + '_ {
        self.pairs.iter().map(ChunkPair::logical_index)
    }

    pub fn lowest_index(&self) -> Option<i32> {
        self.pairs.front().map(ChunkPair::logical_index)
    }

    pub fn highest_index(&self) -> Option<i32> {
        self.pairs.back().map(ChunkPair::logical_index)
    }

    pub fn index_range(&self) -> Option<RangeInclusive<i32>> {
        Some(self.lowest_index()?..=self.highest_index()?)
    }

    pub fn extremity(&self, direction: Direction) -> Option<&ChunkPair> {
        match direction {
            Direction::Forward => self.pairs.back(),
            Direction::Backward => self.pairs.front(),
        }
    }

    pub fn get(&self, logical_index: i32) -> Option<&ChunkPair> {
        let offset = logical_index.checked_sub(self.lowest_index()?)?;
        usize::try_from(offset).ok().and_then(|offset| self.pairs.get(offset))
    }

    pub fn contains(&self, logical_index: i32) -> bool {
        self.get(logical_index).is_some()
    }

    pub fn in_range(&self, start: i32, end: i32) -> impl Iterator<Item = &ChunkPair> {
        self.pairs
            .iter()
            .filter(move |pair| (start..=end).contains(&pair.logical_index()))
    }

    pub fn is_contiguous(&self) -> bool {
        self.pairs
            .iter()
            .zip(self.pairs.iter().skip(1))
            .all(|(a, b)| b.logical_index() == a.logical_index() + 1)
    }

    pub(crate) fn push(&mut self, direction: Direction, pair: ChunkPair) {
        debug_assert!(
            self.extremity(direction)
                .is_none_or(|edge| edge.logical_index() + direction.step() == pair.logical_index()),
            "chunk {} would leave a gap in the window",
            pair.logical_index()
        );
        match direction {
            Direction::Forward => self.pairs.push_back(pair),
            Direction::Backward => self.pairs.push_front(pair),
        }
    }

    pub(crate) fn evict(&mut self, direction: Direction) -> Option<ChunkPair> {
        match direction {
            Direction::Forward => self.pairs.pop_back(),
            Direction::Backward => self.pairs.pop_front(),
        }
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = ChunkPair> + '_ {
        self.pairs.drain(..)
    }
}
