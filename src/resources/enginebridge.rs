//! ECS resources that bridge the viewer core with the rendering engine.
//!
//! Use [`setup_engine`] once during initialization: it spawns the engine's
//! loader thread, inserts the [`EngineBridge`] and returns the
//! [`ChannelGateway`] the core sends its calls through. Call
//! [`shutdown_engine`] during teardown to join the loader.

use crate::events::engine::{EngineMessage, RenderCmd};
use crate::resources::gateway::{DrawRequest, RenderingGateway};
use crate::resources::mapcatalog::DirectorySource;
use crate::resources::tacticalmap::TacticalMap;
use crate::systems::engine::engine_loader_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// The controller type the viewer binary runs with.
pub type ViewerMap = TacticalMap<DirectorySource, ChannelGateway>;

/// Shared bridge between the ECS world and the engine.
#[derive(Resource)]
pub struct EngineBridge {
    /// Receiver for [`RenderCmd`]s issued by the core.
    pub rx_cmd: Receiver<RenderCmd>,
    /// Receiver for [`EngineMessage`]s from the loader thread.
    pub rx_msg: Receiver<EngineMessage>,
    /// Join handle for the loader thread, if one was spawned.
    pub handle: Option<std::thread::JoinHandle<()>>,
}

/// Gateway that forwards calls to the engine as [`RenderCmd`]s.
#[derive(Debug, Clone)]
pub struct ChannelGateway {
    tx_cmd: Sender<RenderCmd>,
}

impl ChannelGateway {
    pub fn new(tx_cmd: Sender<RenderCmd>) -> Self {
        Self { tx_cmd }
    }

    fn send(&self, cmd: RenderCmd) {
        if self.tx_cmd.send(cmd).is_err() {
            warn!("rendering engine is gone, dropping command");
        }
    }
}

impl RenderingGateway for ChannelGateway {
    fn load_map(&mut self, url: &str) {
        self.send(RenderCmd::LoadMap {
            url: url.to_string(),
        });
    }

    fn change_map(&mut self, url: &str) {
        self.send(RenderCmd::ChangeMap {
            url: url.to_string(),
        });
    }

    fn clear_markers(&mut self) {
        self.send(RenderCmd::ClearMarkers);
    }

    fn draw_marker(&mut self, request: DrawRequest) {
        self.send(RenderCmd::DrawMarker(request));
    }
}

/// Files the engine can display, keyed by catalog key and by resolved URL.
#[derive(Resource, Debug, Default, Clone)]
pub struct AssetIndex {
    map: FxHashMap<String, PathBuf>,
}

impl AssetIndex {
    pub fn new(map: FxHashMap<String, PathBuf>) -> Self {
        Self { map }
    }

    /// File behind a map reference, matched exactly.
    pub fn resolve(&self, reference: &str) -> Option<&Path> {
        self.map.get(reference).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Spawn the engine loader and register the bridge resources.
///
/// This function:
/// - Creates command/message channels.
/// - Spawns the loader thread running [`engine_loader_thread`].
/// - Inserts [`EngineBridge`] and an empty [`AssetIndex`].
///
/// The returned gateway is meant to be wrapped by the core's readiness gate.
pub fn setup_engine(world: &mut World, source: DirectorySource) -> ChannelGateway {
    let (tx_cmd, rx_cmd) = unbounded::<RenderCmd>();
    let (tx_msg, rx_msg) = unbounded::<EngineMessage>();

    let handle = std::thread::spawn(move || engine_loader_thread(source, tx_msg));

    world.insert_resource(EngineBridge {
        rx_cmd,
        rx_msg,
        handle: Some(handle),
    });
    world.insert_resource(AssetIndex::default());
    ChannelGateway::new(tx_cmd)
}

/// Join the loader thread, if still around, and remove the bridge.
pub fn shutdown_engine(world: &mut World) {
    if let Some(mut bridge) = world.remove_resource::<EngineBridge>() {
        if let Some(handle) = bridge.handle.take() {
            let _ = handle.join();
        }
    }
}
