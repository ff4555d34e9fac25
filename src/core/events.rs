//! Core domain: events for the session flow.

use bevy::ecs::message::Message;

/// Throw the current layout away and generate a new one.
#[derive(Debug)]
pub struct RestartGameEvent;

impl Message for RestartGameEvent {}
