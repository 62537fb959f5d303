//! Input systems.
//!
//! - [`update_input_state`] reads hardware input from Raylib each frame and
//!   writes the results into [`crate::resources::input::InputState`].
//! - An [`InputEvent`] is triggered for every action key pressed or released
//!   this frame; F11 triggers a
//!   [`SwitchDebugEvent`](crate::events::switchdebug::SwitchDebugEvent).
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use crate::events::input::InputEvent;
use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::input::InputState;

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    let is_key_down = |key: KeyboardKey| rl.is_key_down(key);
    let is_key_pressed = |key: KeyboardKey| rl.is_key_pressed(key);
    let is_key_released = |key: KeyboardKey| rl.is_key_released(key);

    input.mode_debug.active = is_key_down(input.mode_debug.key_binding);
    if is_key_pressed(input.mode_debug.key_binding) {
        commands.trigger(SwitchDebugEvent {});
    }

    for (action, state) in input.actions_mut() {
        state.active = is_key_down(state.key_binding);
        state.just_pressed = is_key_pressed(state.key_binding);
        state.just_released = is_key_released(state.key_binding);

        if state.just_pressed {
            commands.trigger(InputEvent {
                action,
                pressed: true,
            });
        }
        if state.just_released {
            commands.trigger(InputEvent {
                action,
                pressed: false,
            });
        }
    }
}
