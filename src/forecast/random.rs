//! Random sources for forecast jitter and confidence draws

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Draws from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Reproducible generator for a fixed seed
#[derive(Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted.
///
/// An empty sequence always yields `0.5`.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    samples: Vec<f64>,
    position: usize,
}

impl FixedRandom {
    #[must_use]
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    #[must_use]
    pub fn constant(sample: f64) -> Self {
        Self::new(vec![sample])
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.5;
        }
        let sample = self.samples[self.position % self.samples.len()];
        self.position += 1;
        sample
    }
}
