//! Viewer action observers.
//!
//! - [`map_menu_controller_observer`] moves the [`MapMenu`] highlight and
//!   triggers a [`MapSelectionEvent`] on confirm
//! - [`players_action_observer`] pulls the next frame from the
//!   [`PlayerFeed`] and triggers a [`ShowPlayersEvent`]
//! - [`toggle_labels_observer`] flips marker id labels
//!
//! All of them react to key presses only; releases are ignored.

use crate::components::mapmenu::MapMenu;
use crate::events::input::{InputAction, InputEvent};
use crate::events::mapselection::MapSelectionEvent;
use crate::events::showplayers::ShowPlayersEvent;
use crate::resources::maprenderer::MarkerStyle;
use crate::resources::playerfeed::PlayerFeed;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

/// Handles input events to navigate the map list and confirm a map.
pub fn map_menu_controller_observer(
    trigger: On<InputEvent>,
    mut query: Query<&mut MapMenu>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if !event.pressed {
        return;
    }
    for mut menu in query.iter_mut() {
        match event.action {
            InputAction::MenuUp => {
                menu.select_previous();
            }
            InputAction::MenuDown => {
                menu.select_next();
            }
            InputAction::ShowSelectedMap => {
                if let Some(item) = menu.selected() {
                    debug!("Map menu confirmed '{}'", item.value);
                    commands.trigger(MapSelectionEvent {
                        raw_value: item.value.clone(),
                    });
                }
            }
            _ => {}
        }
    }
}

/// Fetch the next player frame when the "show players" key is pressed.
pub fn players_action_observer(
    trigger: On<InputEvent>,
    mut feed: ResMut<PlayerFeed>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if !event.pressed || event.action != InputAction::ShowPlayers {
        return;
    }
    match feed.next_frame() {
        Ok(markers) => commands.trigger(ShowPlayersEvent { markers }),
        Err(e) => warn!("No player frame available: {}", e),
    }
}

pub fn toggle_labels_observer(trigger: On<InputEvent>, mut style: ResMut<MarkerStyle>) {
    let event = trigger.event();
    if event.pressed && event.action == InputAction::ToggleLabels {
        style.show_labels = !style.show_labels;
        debug!("Marker labels {}", if style.show_labels { "on" } else { "off" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::mapcatalog::MapAsset;
    use crate::resources::playerfeed::FeedSource;
    use raylib::prelude::Vector2;

    #[derive(Resource, Default)]
    struct Seen(Vec<String>);

    fn record_selection(trigger: On<MapSelectionEvent>, mut seen: ResMut<Seen>) {
        seen.0.push(trigger.event().raw_value.clone());
    }

    #[derive(Resource, Default)]
    struct Frames(Vec<usize>);

    fn record_players(trigger: On<ShowPlayersEvent>, mut frames: ResMut<Frames>) {
        frames.0.push(trigger.event().markers.len());
    }

    fn press(world: &mut World, action: InputAction) {
        world.trigger(InputEvent {
            action,
            pressed: true,
        });
        world.flush();
    }

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(Seen::default());
        world.insert_resource(Frames::default());
        world.insert_resource(MarkerStyle::default());
        world.insert_resource(PlayerFeed::new(FeedSource::Fixed));
        world.add_observer(map_menu_controller_observer);
        world.add_observer(players_action_observer);
        world.add_observer(toggle_labels_observer);
        world.add_observer(record_selection);
        world.add_observer(record_players);
        world.spawn(MapMenu::new(
            &[
                MapAsset::new("./assets/ascent.png", "/img/ascent-1.png"),
                MapAsset::new("./assets/bind.png", "/img/bind-2.png"),
            ],
            Vector2 { x: 0.0, y: 0.0 },
            20,
            24.0,
        ));
        world.flush();
        world
    }

    #[test]
    fn confirm_sends_highlighted_catalog_key() {
        let mut world = make_world();
        press(&mut world, InputAction::MenuDown);
        press(&mut world, InputAction::ShowSelectedMap);
        assert_eq!(world.resource::<Seen>().0, vec!["./assets/bind.png"]);
    }

    #[test]
    fn releases_are_ignored() {
        let mut world = make_world();
        world.trigger(InputEvent {
            action: InputAction::ShowSelectedMap,
            pressed: false,
        });
        world.flush();
        assert!(world.resource::<Seen>().0.is_empty());
    }

    #[test]
    fn show_players_emits_a_frame() {
        let mut world = make_world();
        press(&mut world, InputAction::ShowPlayers);
        assert_eq!(world.resource::<Frames>().0, vec![2]);
    }

    #[test]
    fn labels_toggle_back_and_forth() {
        let mut world = make_world();
        press(&mut world, InputAction::ToggleLabels);
        assert!(!world.resource::<MarkerStyle>().show_labels);
        press(&mut world, InputAction::ToggleLabels);
        assert!(world.resource::<MarkerStyle>().show_labels);
    }
}
