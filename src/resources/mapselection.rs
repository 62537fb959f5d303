//! Map selection state and the controller that keeps it in sync with the
//! rendering engine.
//!
//! The controller decides whether a selection event from the UI is a genuine
//! map change. Only genuine changes reach the gateway; re-selecting the map
//! already on screen is a no-op.

use crate::resources::gateway::RenderingGateway;
use crate::resources::mapcatalog::{AssetCatalog, AssetSource};
use crate::resources::mapname::{MapName, ParseError};
use log::{debug, info, warn};

/// What is currently loaded in the rendering engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSelectionState {
    /// Last value accepted by the gateway's load/change operation.
    pub current_url: Option<String>,
    /// Canonical name of `current_url`, computed when it was accepted.
    pub current_name: Option<MapName>,
}

impl MapSelectionState {
    pub fn is_loaded(&self) -> bool {
        self.current_url.is_some()
    }
}

/// Result of handling one selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A change request was issued to the gateway.
    Changed(MapName),
    /// The selection names the map already loaded.
    Unchanged(MapName),
    /// The raw value could not be parsed; nothing happened.
    Rejected(ParseError),
    /// The engine no longer takes calls; nothing happened.
    EngineUnavailable(MapName),
}

/// Owner of [`MapSelectionState`].
#[derive(Debug, Default)]
pub struct MapSelectionController {
    state: MapSelectionState,
}

impl MapSelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MapSelectionState {
        &self.state
    }

    /// Forget what is loaded, so the next selection always loads.
    pub fn reset(&mut self) {
        self.state = MapSelectionState::default();
    }

    /// Load the first catalog entry.
    ///
    /// Does nothing on an empty catalog or when the gateway no longer takes calls.
    pub fn initialize<S: AssetSource>(
        &mut self,
        catalog: &AssetCatalog<S>,
        gateway: &mut impl RenderingGateway,
    ) -> Option<MapName> {
        if !gateway.is_accepting() {
            warn!("Rendering engine unavailable, not loading an initial map");
            return None;
        }
        let Some(first) = catalog.enumerate().into_iter().next() else {
            info!("Map catalog is empty, nothing to load");
            return None;
        };
        gateway.load_map(&first.url);
        let name = MapName::from_rendered_url(&first.url)
            .or_else(|_| MapName::from_catalog_key(&first.name))
            .ok();
        info!("Initial map {} ({:?})", first.url, name);
        self.state = MapSelectionState {
            current_url: Some(first.url),
            current_name: name.clone(),
        };
        name
    }

    /// Handle a selection event from the UI.
    ///
    /// Never fails outward: malformed values are logged and ignored.
    pub fn on_selection_changed(
        &mut self,
        raw_value: &str,
        gateway: &mut impl RenderingGateway,
    ) -> SelectionOutcome {
        let selected = match MapName::from_catalog_key(raw_value) {
            Ok(name) => name,
            Err(e) => {
                warn!("Ignoring map selection: {}", e);
                return SelectionOutcome::Rejected(e);
            }
        };

        if self.state.current_name.as_ref() == Some(&selected) {
            debug!("Map {} already loaded, skipping reload", selected);
            return SelectionOutcome::Unchanged(selected);
        }

        if !gateway.is_accepting() {
            warn!("Rendering engine unavailable, ignoring selection of {}", selected);
            return SelectionOutcome::EngineUnavailable(selected);
        }

        info!(
            "Changing map {:?} -> {} ({})",
            self.state.current_name.as_ref().map(MapName::as_str),
            selected,
            raw_value
        );
        gateway.change_map(raw_value);
        self.state = MapSelectionState {
            current_url: Some(raw_value.to_string()),
            current_name: Some(selected.clone()),
        };
        SelectionOutcome::Changed(selected)
    }
}
