//! Random reply selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform choices over a reply set.
pub trait ReplyPicker {
    /// Pick an index in `0..len`, or `None` when `len == 0`.
    fn pick_index(&mut self, len: usize) -> Option<usize>;

    fn pick<'a>(&mut self, options: &'a [String]) -> Option<&'a str> {
        self.pick_index(options.len())
            .and_then(|i| options.get(i))
            .map(String::as_str)
    }
}

/// Uniform picker over `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    /// Fresh entropy from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence; same seed, same replies.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ReplyPicker for SeededPicker {
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

/// Always picks the same position (clamped to the set size).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl ReplyPicker for FixedPicker {
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.0.min(len - 1))
    }
}
