//! Core domain: session configuration.

use bevy::prelude::*;
use rand::Rng;

#[derive(Resource, Debug)]
pub struct SessionConfig {
    pub seed: u64,
    /// Number of layouts generated this session; mixed into the seed.
    pub generation: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
            generation: 0,
        }
    }
}

impl SessionConfig {
    /// Seed for one generation attempt of the current layout.
    pub fn attempt_seed(&self, attempt: u32) -> u64 {
        self.seed
            .wrapping_add(u64::from(self.generation) << 32)
            .wrapping_add(u64::from(attempt))
    }
}
