//! Core domain: game state definitions for the session flow.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    #[default]
    Boot,
    /// A layout is being generated for the current seed.
    Generating,
    Playing,
}
