//! The viewer's controller object.
//!
//! [`TacticalMap`] is built from an injected [`AssetCatalog`] and rendering
//! gateway. It owns the selection controller, the overlay manager and the
//! readiness gate, and exposes the UI actions as methods. Observers in
//! [`crate::events`] call into it; tests drive it directly with a
//! [`RecordingGateway`](crate::resources::gateway::RecordingGateway).

use crate::resources::gateway::{EngineGate, EngineLifecycle, RenderingGateway};
use crate::resources::mapcatalog::{AssetCatalog, AssetSource, MapAsset};
use crate::resources::mapname::MapName;
use crate::resources::mapselection::{MapSelectionController, MapSelectionState, SelectionOutcome};
use crate::resources::playeroverlay::{PlayerMarker, PlayerOverlayManager};
use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug)]
pub struct TacticalMap<S, G>
where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    catalog: AssetCatalog<S>,
    gate: EngineGate<G>,
    selection: MapSelectionController,
    overlay: PlayerOverlayManager,
}

impl<S, G> TacticalMap<S, G>
where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    /// Controller in front of an engine that has not finished loading.
    pub fn new(catalog: AssetCatalog<S>, gateway: G) -> Self {
        Self {
            catalog,
            gate: EngineGate::new(gateway),
            selection: MapSelectionController::new(),
            overlay: PlayerOverlayManager::default(),
        }
    }

    /// Controller in front of an engine that is already usable.
    pub fn with_ready_engine(catalog: AssetCatalog<S>, gateway: G) -> Self {
        Self {
            catalog,
            gate: EngineGate::ready(gateway),
            selection: MapSelectionController::new(),
            overlay: PlayerOverlayManager::default(),
        }
    }

    pub fn with_overlay(mut self, overlay: PlayerOverlayManager) -> Self {
        self.overlay = overlay;
        self
    }

    /// Load the first catalog map.
    pub fn initialize(&mut self) -> Option<MapName> {
        self.selection.initialize(&self.catalog, &mut self.gate)
    }

    /// "Show selected map" action.
    pub fn on_selection_changed(&mut self, raw_value: &str) -> SelectionOutcome {
        self.selection.on_selection_changed(raw_value, &mut self.gate)
    }

    /// "Show players" action.
    pub fn show_players(&mut self, markers: &[PlayerMarker]) -> usize {
        self.overlay.show_players(markers, &mut self.gate)
    }

    /// The engine finished loading; flush queued calls.
    ///
    /// When nothing is loaded yet, as after a failure, the first catalog map
    /// is loaded too.
    pub fn engine_ready(&mut self) -> usize {
        let flushed = self.gate.mark_ready();
        if !self.selection.state().is_loaded() {
            self.initialize();
        }
        flushed
    }

    /// The engine failed to load; later calls are rejected.
    ///
    /// Queued loads are dropped with the queue, so nothing counts as loaded
    /// anymore and a late ready starts from an empty selection.
    pub fn engine_failed(&mut self, reason: impl Into<String>) {
        self.gate.mark_failed(reason);
        self.selection.reset();
    }

    pub fn assets(&self) -> Vec<MapAsset> {
        self.catalog.enumerate()
    }

    pub fn catalog(&self) -> &AssetCatalog<S> {
        &self.catalog
    }

    pub fn current_map(&self) -> &MapSelectionState {
        self.selection.state()
    }

    pub fn lifecycle(&self) -> &EngineLifecycle {
        self.gate.lifecycle()
    }

    pub fn gate(&self) -> &EngineGate<G> {
        &self.gate
    }

    pub fn gateway(&self) -> &G {
        self.gate.inner()
    }
}
