//! Procedural dungeon rooms: graph-driven layout generation, per-room
//! occupancy state, and the Bevy plugins that play it.

pub mod camera;
pub mod content;
pub mod core;
#[cfg(feature = "dev-tools")]
pub mod debug;
pub mod layout;
pub mod rooms;
