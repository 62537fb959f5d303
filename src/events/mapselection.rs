//! "Show selected map" event.
//!
//! The map menu triggers a [`MapSelectionEvent`] carrying the raw value of the
//! chosen item. [`map_selection_observer`] hands it to the
//! [`TacticalMap`] controller, which decides whether the engine must switch.
use crate::resources::gateway::RenderingGateway;
use crate::resources::mapcatalog::AssetSource;
use crate::resources::mapselection::SelectionOutcome;
use crate::resources::tacticalmap::TacticalMap;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

#[derive(Event, Debug, Clone)]
pub struct MapSelectionEvent {
    /// Catalog key (or any path-like reference) of the requested map.
    pub raw_value: String,
}

pub fn map_selection_observer<S, G>(
    trigger: On<MapSelectionEvent>,
    mut map: ResMut<TacticalMap<S, G>>,
) where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    let raw_value = &trigger.event().raw_value;
    match map.on_selection_changed(raw_value) {
        SelectionOutcome::Changed(name) => info!("Map changed to '{}'", name),
        SelectionOutcome::Unchanged(name) => debug!("Map '{}' already shown", name),
        SelectionOutcome::Rejected(err) => debug!("Selection '{}' rejected: {}", raw_value, err),
        SelectionOutcome::EngineUnavailable(name) => {
            debug!("Map '{}' not shown, engine unavailable", name)
        }
    }
}
