//! Viewer Integration Tests
//!
//! These tests drive a bevy_ecs `World` the way the viewer binary does, but
//! with a [`RecordingGateway`] in place of the raylib engine.
//!
//! # Test Categories
//!
//! 1. **Map selection** - observers, change detection, idempotence
//! 2. **Player overlay** - ordered draw requests, color defaults
//! 3. **Engine lifecycle** - queueing before readiness, flush, failure, late ready
//! 4. **Menu flow** - input events through the map menu to the gateway
//!
//! # Usage
//!
//! ```sh
//! cargo test --test viewer_integration
//! ```

use bevy_ecs::prelude::*;
use crossbeam_channel::unbounded;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

use tacmap::components::mapmenu::MapMenu;
use tacmap::events::engine::EngineMessage;
use tacmap::events::input::{InputAction, InputEvent};
use tacmap::events::mapselection::{MapSelectionEvent, map_selection_observer};
use tacmap::events::showplayers::{ShowPlayersEvent, show_players_observer};
use tacmap::resources::enginebridge::{AssetIndex, EngineBridge};
use tacmap::resources::gateway::{DrawRequest, EngineLifecycle, GatewayCall, RecordingGateway};
use tacmap::resources::mapcatalog::{AssetCatalog, MapAsset, StaticSource};
use tacmap::resources::mapname::MapName;
use tacmap::resources::mapselection::MapSelectionState;
use tacmap::resources::maprenderer::MarkerStyle;
use tacmap::resources::playerfeed::{FeedSource, PlayerFeed};
use tacmap::resources::playeroverlay::PlayerMarker;
use tacmap::resources::tacticalmap::TacticalMap;
use tacmap::systems::engine::poll_engine_messages;
use tacmap::systems::mapmenu::{map_menu_controller_observer, players_action_observer};

type TestMap = TacticalMap<StaticSource, RecordingGateway>;

// =============================================================================
// Helpers
// =============================================================================

fn catalog() -> AssetCatalog<StaticSource> {
    AssetCatalog::new(StaticSource(vec![
        MapAsset::new("./assets/ascent.png", "http://127.0.0.1/images/ascent-3fa9.png"),
        MapAsset::new("./assets/delta.png", "http://127.0.0.1/images/delta-x7f2.png"),
    ]))
}

fn register_observers(world: &mut World) {
    world.add_observer(map_selection_observer::<StaticSource, RecordingGateway>);
    world.add_observer(show_players_observer::<StaticSource, RecordingGateway>);
    world.add_observer(map_menu_controller_observer);
    world.add_observer(players_action_observer);
    world.flush();
}

/// World with an engine that is ready from the start and an initialized map.
fn make_world() -> World {
    let mut world = World::new();
    let mut map = TestMap::with_ready_engine(catalog(), RecordingGateway::new());
    map.initialize();
    world.insert_resource(map);
    world.insert_resource(PlayerFeed::new(FeedSource::Fixed));
    world.insert_resource(MarkerStyle::default());
    register_observers(&mut world);
    world
}

fn select(world: &mut World, raw_value: &str) {
    world.trigger(MapSelectionEvent {
        raw_value: raw_value.to_string(),
    });
    world.flush();
}

fn press(world: &mut World, action: InputAction) {
    world.trigger(InputEvent {
        action,
        pressed: true,
    });
    world.flush();
}

fn calls(world: &World) -> Vec<GatewayCall> {
    world.resource::<TestMap>().gateway().calls.clone()
}

// =============================================================================
// 1. Map selection
// =============================================================================

#[test]
fn initialize_loads_first_catalog_url() {
    let world = make_world();
    assert_eq!(
        calls(&world),
        vec![GatewayCall::LoadMap(
            "http://127.0.0.1/images/ascent-3fa9.png".into()
        )]
    );
    let state = world.resource::<TestMap>().current_map().clone();
    assert_eq!(state.current_name, Some(MapName::new("ascent")));
}

#[test]
fn selecting_a_different_map_changes_it_once() {
    let mut world = make_world();
    select(&mut world, "./assets/delta.png");
    select(&mut world, "./assets/delta.png");

    let changes: Vec<GatewayCall> = calls(&world)
        .into_iter()
        .filter(|c| matches!(c, GatewayCall::ChangeMap(_)))
        .collect();
    assert_eq!(
        changes,
        vec![GatewayCall::ChangeMap("./assets/delta.png".into())]
    );
    let state = world.resource::<TestMap>().current_map().clone();
    assert_eq!(state.current_url.as_deref(), Some("./assets/delta.png"));
}

#[test]
fn reselecting_the_initial_map_is_a_no_op() {
    let mut world = make_world();
    select(&mut world, "./assets/ascent.png");
    assert_eq!(world.resource::<TestMap>().gateway().map_calls(), 1);
}

#[test]
fn malformed_selection_is_ignored() {
    let mut world = make_world();
    let before = world.resource::<TestMap>().current_map().clone();
    select(&mut world, "not-a-path");
    assert_eq!(world.resource::<TestMap>().gateway().map_calls(), 1);
    assert_eq!(world.resource::<TestMap>().current_map(), &before);
}

// =============================================================================
// 2. Player overlay
// =============================================================================

#[test]
fn show_players_draws_in_list_order() {
    let mut world = make_world();
    world.trigger(ShowPlayersEvent {
        markers: vec![
            PlayerMarker::new(1, 250.0, 250.0).with_color("red"),
            PlayerMarker::new(2, 300.0, 300.0).with_color("blue"),
        ],
    });
    world.flush();

    let map = world.resource::<TestMap>();
    let draws: Vec<DrawRequest> = map.gateway().draws().into_iter().cloned().collect();
    assert_eq!(
        draws,
        vec![
            DrawRequest::new(1, 250.0, 250.0, "red"),
            DrawRequest::new(2, 300.0, 300.0, "blue"),
        ]
    );
}

#[test]
fn show_players_twice_draws_twice() {
    let mut world = make_world();
    let markers = vec![PlayerMarker::new(7, 1.0, 2.0)];
    for _ in 0..2 {
        world.trigger(ShowPlayersEvent {
            markers: markers.clone(),
        });
        world.flush();
    }
    let map = world.resource::<TestMap>();
    let draws = map.gateway().draws();
    assert_eq!(draws.len(), 2);
    assert!(draws.iter().all(|d| d.color == "black"));
    assert_eq!(map.gateway().visible_draws().len(), 1);
}

#[test]
fn second_batch_replaces_the_first() {
    let mut world = make_world();
    world.trigger(ShowPlayersEvent {
        markers: (1..=10)
            .map(|id| PlayerMarker::new(id, id as f32, id as f32))
            .collect(),
    });
    world.flush();
    world.trigger(ShowPlayersEvent {
        markers: (11..=20)
            .map(|id| PlayerMarker::new(id, id as f32, id as f32))
            .collect(),
    });
    world.flush();

    let map = world.resource::<TestMap>();
    let visible: Vec<u32> = map.gateway().visible_draws().iter().map(|d| d.id).collect();
    assert_eq!(visible, (11..=20).collect::<Vec<u32>>());
}

#[test]
fn empty_frame_draws_nothing() {
    let mut world = make_world();
    world.trigger(ShowPlayersEvent::default());
    world.flush();
    let map = world.resource::<TestMap>();
    assert!(map.gateway().draws().is_empty());
    assert_eq!(map.gateway().calls.last(), Some(&GatewayCall::ClearMarkers));
}

// =============================================================================
// 3. Engine lifecycle
// =============================================================================

fn make_pending_world() -> (World, crossbeam_channel::Sender<EngineMessage>) {
    let mut world = World::new();
    let mut map = TestMap::new(catalog(), RecordingGateway::new());
    map.initialize();
    world.insert_resource(map);

    let (_tx_cmd, rx_cmd) = unbounded();
    let (tx_msg, rx_msg) = unbounded();
    world.insert_resource(EngineBridge {
        rx_cmd,
        rx_msg,
        handle: None,
    });
    world.insert_resource(AssetIndex::default());
    world.insert_resource(PlayerFeed::new(FeedSource::Fixed));
    register_observers(&mut world);
    (world, tx_msg)
}

fn poll(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(poll_engine_messages::<StaticSource, RecordingGateway>);
    schedule.run(world);
}

#[test]
fn calls_before_readiness_are_queued_then_flushed_in_order() {
    let (mut world, tx) = make_pending_world();
    select(&mut world, "./assets/delta.png");
    world.trigger(ShowPlayersEvent {
        markers: vec![PlayerMarker::new(1, 10.0, 10.0)],
    });
    world.flush();

    assert!(calls(&world).is_empty());
    assert_eq!(world.resource::<TestMap>().gate().pending().len(), 4);

    let mut index = FxHashMap::default();
    index.insert("./assets/delta.png".to_string(), PathBuf::from("/maps/delta.png"));
    tx.send(EngineMessage::Ready { index }).unwrap();
    poll(&mut world);

    let map = world.resource::<TestMap>();
    assert_eq!(map.lifecycle(), &EngineLifecycle::Ready);
    assert!(map.gate().pending().is_empty());
    let recorded = &map.gateway().calls;
    assert!(matches!(recorded[0], GatewayCall::LoadMap(_)));
    assert_eq!(
        recorded[1],
        GatewayCall::ChangeMap("./assets/delta.png".into())
    );
    assert_eq!(recorded[2], GatewayCall::ClearMarkers);
    assert!(matches!(recorded[3], GatewayCall::DrawMarker(_)));
    assert_eq!(world.resource::<AssetIndex>().len(), 1);
}

#[test]
fn failed_engine_rejects_later_calls() {
    let (mut world, tx) = make_pending_world();
    tx.send(EngineMessage::Failed {
        error: "no maps".into(),
    })
    .unwrap();
    poll(&mut world);

    select(&mut world, "./assets/delta.png");
    world.trigger(ShowPlayersEvent {
        markers: vec![PlayerMarker::new(1, 10.0, 10.0)],
    });
    world.flush();

    let map = world.resource::<TestMap>();
    assert_eq!(map.lifecycle(), &EngineLifecycle::Failed("no maps".into()));
    assert!(map.gateway().calls.is_empty());
    assert!(map.gate().pending().is_empty());
    // the queued initial load was dropped and the rejected change is not recorded
    assert_eq!(map.current_map(), &MapSelectionState::default());
}

#[test]
fn late_ready_after_failure_loads_again() {
    let (mut world, tx) = make_pending_world();
    tx.send(EngineMessage::Failed {
        error: "no maps".into(),
    })
    .unwrap();
    poll(&mut world);
    select(&mut world, "./assets/delta.png");

    tx.send(EngineMessage::Ready {
        index: FxHashMap::default(),
    })
    .unwrap();
    poll(&mut world);
    assert_eq!(
        calls(&world),
        vec![GatewayCall::LoadMap(
            "http://127.0.0.1/images/ascent-3fa9.png".into()
        )]
    );

    select(&mut world, "./assets/delta.png");
    assert_eq!(
        calls(&world).last(),
        Some(&GatewayCall::ChangeMap("./assets/delta.png".into()))
    );
    assert_eq!(
        world.resource::<TestMap>().current_map().current_name,
        Some(MapName::new("delta"))
    );
}

#[test]
fn polling_without_messages_keeps_waiting() {
    let (mut world, _tx) = make_pending_world();
    poll(&mut world);
    assert_eq!(
        world.resource::<TestMap>().lifecycle(),
        &EngineLifecycle::NotReady
    );
}

// =============================================================================
// 4. Menu flow
// =============================================================================

#[test]
fn menu_confirm_reaches_the_gateway() {
    let mut world = make_world();
    let assets = world.resource::<TestMap>().assets();
    world.spawn(MapMenu::new(&assets, Vector2 { x: 0.0, y: 0.0 }, 20, 28.0));
    world.flush();

    // first item is the map already shown
    press(&mut world, InputAction::ShowSelectedMap);
    assert_eq!(world.resource::<TestMap>().gateway().map_calls(), 1);

    press(&mut world, InputAction::MenuDown);
    press(&mut world, InputAction::ShowSelectedMap);
    assert_eq!(
        calls(&world).last(),
        Some(&GatewayCall::ChangeMap("./assets/delta.png".into()))
    );
}

#[test]
fn players_key_draws_the_fixed_frame() {
    let mut world = make_world();
    press(&mut world, InputAction::ShowPlayers);
    let map = world.resource::<TestMap>();
    let draws = map.gateway().visible_draws();
    let colors: Vec<&str> = draws.iter().map(|d| d.color.as_str()).collect();
    assert_eq!(colors, vec!["red", "blue"]);
}
