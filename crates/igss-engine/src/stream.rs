//! Weighted example stream over a dataset.
//!
//! Examples are drawn uniformly with replacement. In rejection mode an
//! example is accepted with probability equal to its weight (clamped to
//! `[0, 1]`) and then counts with weight 1; in weighted mode it is always
//! accepted and counts with its own weight. Zero-weight examples never
//! contribute.

use igss_types::{Dataset, Example};
use rand::Rng;

use crate::config::SamplingMode;

/// An accepted draw.
#[derive(Clone, Copy, Debug)]
pub struct Draw<'a> {
    pub index: usize,
    pub example: &'a Example,
    /// Weight the example contributes to the statistics.
    pub weight: f64,
}

pub struct ExampleStream<'a, R: Rng> {
    dataset: &'a Dataset,
    mode: SamplingMode,
    rng: &'a mut R,
    draws: u64,
}

impl<'a, R: Rng> ExampleStream<'a, R> {
    pub fn new(dataset: &'a Dataset, mode: SamplingMode, rng: &'a mut R) -> Self {
        Self {
            dataset,
            mode,
            rng,
            draws: 0,
        }
    }

    /// Draws attempted so far, rejected ones included.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Draw one example. `None` when it was rejected or carries no weight.
    pub fn draw(&mut self) -> Option<Draw<'a>> {
        if self.dataset.is_empty() {
            return None;
        }
        self.draws += 1;
        let index = self.rng.gen_range(0..self.dataset.len());
        let example = self.dataset.example(index)?;
        let weight = example.weight();
        match self.mode {
            SamplingMode::Rejection => {
                let p = weight.clamp(0.0, 1.0);
                if p > 0.0 && self.rng.gen::<f64>() < p {
                    Some(Draw {
                        index,
                        example,
                        weight: 1.0,
                    })
                } else {
                    None
                }
            }
            SamplingMode::Weighted => {
                if weight > 0.0 {
                    Some(Draw {
                        index,
                        example,
                        weight,
                    })
                } else {
                    None
                }
            }
        }
    }
}
