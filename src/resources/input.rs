//! Per-frame keyboard input resource.
//!
//! Captures the keys the viewer cares about and exposes them to systems via
//! the [`InputState`] resource. Arrow keys move through the map list, Enter
//! shows the highlighted map, P shows players, L toggles labels and F11
//! toggles the debug overlay.
use crate::events::input::InputAction;
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently active/pressed this frame.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the key was just released this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

/// Resource capturing the per-frame keyboard state relevant to the viewer.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub menu_up: BoolState,
    pub menu_down: BoolState,
    pub show_selected_map: BoolState,
    pub show_players: BoolState,
    pub toggle_labels: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            menu_up: BoolState::bound_to(KeyboardKey::KEY_UP),
            menu_down: BoolState::bound_to(KeyboardKey::KEY_DOWN),
            show_selected_map: BoolState::bound_to(KeyboardKey::KEY_ENTER),
            show_players: BoolState::bound_to(KeyboardKey::KEY_P),
            toggle_labels: BoolState::bound_to(KeyboardKey::KEY_L),
            mode_debug: BoolState::bound_to(KeyboardKey::KEY_F11),
        }
    }
}

impl InputState {
    /// Action keys paired with the action they emit.
    pub fn actions_mut(&mut self) -> [(InputAction, &mut BoolState); 5] {
        [
            (InputAction::MenuUp, &mut self.menu_up),
            (InputAction::MenuDown, &mut self.menu_down),
            (InputAction::ShowSelectedMap, &mut self.show_selected_map),
            (InputAction::ShowPlayers, &mut self.show_players),
            (InputAction::ToggleLabels, &mut self.toggle_labels),
        ]
    }
}
