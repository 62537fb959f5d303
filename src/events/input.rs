//! Input action events.
//!
//! This module defines [`InputEvent`] which is triggered when a viewer action
//! key is pressed or released. The [`InputAction`] enum lists all recognized
//! actions.
//!
//! Observers subscribe to these events to react to input without directly
//! reading the [`InputState`](crate::resources::input::InputState) resource.

use bevy_ecs::prelude::*;

/// Enumeration of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move the map list highlight up (default: Up arrow).
    MenuUp,
    /// Move the map list highlight down (default: Down arrow).
    MenuDown,
    /// Show the highlighted map (default: Enter).
    ShowSelectedMap,
    /// Show the players of the next frame (default: P).
    ShowPlayers,
    /// Toggle player id labels (default: L).
    ToggleLabels,
}

/// Event emitted when an input action is pressed or released.
#[derive(Event, Debug, Clone, Copy)]
pub struct InputEvent {
    /// The input action that triggered this event.
    pub action: InputAction,
    /// Whether the action was pressed (true) or released (false).
    pub pressed: bool,
}
