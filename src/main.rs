//! Tactical map viewer entry point.
//!
//! A map viewer for match replays written in Rust using:
//! - **raylib** for windowing and drawing
//! - **bevy_ecs** for resources, observers and the frame schedule
//!
//! # Project Structure
//!
//! - [`components`] – ECS components (the map menu)
//! - [`events`] – Event types and their observers (input, map selection, players)
//! - [`resources`] – Controllers, catalog, rendering gateway and configuration
//! - [`systems`] – ECS systems (input, engine polling, rendering)
//!
//! # Main Loop
//!
//! 1. Load `config.ini`, apply command line overrides, open the window
//! 2. Start the engine loader thread and build the [`ViewerMap`] controller
//! 3. Load the first catalog map (queued until the engine is ready)
//! 4. Register observers and systems
//! 5. Each frame: read input, poll the engine, apply render commands, draw
//! 6. Join the loader thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --assets ./assets --demo-players 10
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod components;
mod events;
mod resources;
mod systems;

use crate::components::mapmenu::MapMenu;
use crate::events::mapselection::map_selection_observer;
use crate::events::showplayers::show_players_observer;
use crate::events::switchdebug::switch_debug_observer;
use crate::resources::enginebridge::{ChannelGateway, ViewerMap, setup_engine, shutdown_engine};
use crate::resources::input::InputState;
use crate::resources::mapcatalog::{AssetCatalog, DirectorySource};
use crate::resources::maprenderer::{MapRenderer, MarkerStyle};
use crate::resources::playerfeed::{FeedSource, PlayerFeed};
use crate::resources::playeroverlay::PlayerOverlayManager;
use crate::resources::viewerconfig::ViewerConfig;
use crate::systems::engine::poll_engine_messages;
use crate::systems::input::update_input_state;
use crate::systems::mapmenu::{
    map_menu_controller_observer, players_action_observer, toggle_labels_observer,
};
use crate::systems::render::{apply_render_cmds, render_system};
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use raylib::prelude::Vector2;
use std::path::PathBuf;

/// Size in map pixels of the area demo players roam.
const DEMO_MAP_SIZE: f32 = 500.0;

/// Tactical map viewer
#[derive(Parser)]
#[command(version, about = "Shows a match map and the players on it.")]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory with the `.png` maps, overriding the configuration.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// JSON file with a player frame, re-read every time players are shown.
    #[arg(long, value_name = "JSON", conflicts_with = "demo_players")]
    players: Option<PathBuf>,

    /// Show this many randomly placed players instead of a fixed frame.
    #[arg(long, value_name = "N")]
    demo_players: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // --------------- Configuration ---------------
    let mut config = match cli.config {
        Some(path) => ViewerConfig::with_path(path),
        None => ViewerConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    if let Some(dir) = cli.assets {
        config.assets_dir = dir;
    }
    let feed_source = match (cli.players, cli.demo_players) {
        (Some(path), _) => FeedSource::File(path),
        (None, Some(count)) => FeedSource::Demo {
            count,
            width: DEMO_MAP_SIZE,
            height: DEMO_MAP_SIZE,
        },
        (None, None) => FeedSource::Fixed,
    };

    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let (mut rl, thread) = raylib::init()
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Tactical Map")
        .build();
    rl.set_target_fps(config.target_fps);
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let source = DirectorySource::new(&config.assets_dir, &config.url_base);
    let gateway = setup_engine(&mut world, source.clone());

    let mut map = ViewerMap::new(AssetCatalog::new(source), gateway)
        .with_overlay(PlayerOverlayManager::new(&config.default_marker_color));
    match map.initialize() {
        Some(name) => log::info!("Initial map '{}'", name),
        None => log::warn!("No maps found in {:?}", config.assets_dir),
    }

    world.spawn(MapMenu::new(
        &map.assets(),
        Vector2 { x: 10.0, y: 44.0 },
        20,
        28.0,
    ));
    world.insert_resource(map);
    world.insert_resource(MarkerStyle {
        radius: config.marker_radius,
        show_labels: config.show_labels,
    });
    world.insert_resource(PlayerFeed::new(feed_source));
    world.insert_resource(InputState::default());
    world.insert_resource(config);
    world.insert_non_send_resource(MapRenderer::new());
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    world.spawn(Observer::new(switch_debug_observer));
    world.spawn(Observer::new(map_menu_controller_observer));
    world.spawn(Observer::new(players_action_observer));
    world.spawn(Observer::new(toggle_labels_observer));
    world.spawn(Observer::new(
        map_selection_observer::<DirectorySource, ChannelGateway>,
    ));
    world.spawn(Observer::new(
        show_players_observer::<DirectorySource, ChannelGateway>,
    ));
    // Ensure the observers are registered before we run any systems that may trigger events.
    world.flush();

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_input_state,
            poll_engine_messages::<DirectorySource, ChannelGateway>,
            apply_render_cmds,
            render_system::<DirectorySource, ChannelGateway>,
        )
            .chain(),
    );

    if let Err(e) = update.initialize(&mut world) {
        log::error!("Failed to initialize schedule: {}", e);
        shutdown_engine(&mut world);
        return;
    }

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        update.run(&mut world);
        world.clear_trackers();
    }
    shutdown_engine(&mut world);
}
