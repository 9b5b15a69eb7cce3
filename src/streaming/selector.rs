use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PrototypeSelection;

/// Picks which configured prototype the next chunk pair uses.
pub trait PrototypeSelector: Send + Sync {
    /// Returns an index in `0..count`. `count` is never zero.
    fn select(&mut self, count: usize) -> usize;
}

pub struct UniformSelector {
    rng: StdRng,
}

impl UniformSelector {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl PrototypeSelector for UniformSelector {
    fn select(&mut self, count: usize) -> usize {
        self.rng.random_range(0..count)
    }
}

#[derive(Default)]
pub struct SequentialSelector {
    next: usize,
}

impl PrototypeSelector for SequentialSelector {
    fn select(&mut self, count: usize) -> usize {
        let index = self.next % count;
        self.next = self.next.wrapping_add(1);
        index
    }
}

pub fn selector_for(selection: &PrototypeSelection) -> Box<dyn PrototypeSelector> {
    match selection {
        PrototypeSelection::Uniform { seed: Some(seed) } => Box::new(UniformSelector::seeded(*seed)),
        PrototypeSelection::Uniform { seed: None } => Box::new(UniformSelector::from_os_rng()),
        PrototypeSelection::Sequential => Box::new(SequentialSelector::default()),
    }
}
