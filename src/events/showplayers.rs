//! "Show players" event.
//!
//! A [`ShowPlayersEvent`] carries one frame of player positions. The
//! [`show_players_observer`] turns them into draw requests, in list order,
//! through the [`TacticalMap`] controller.
use crate::resources::gateway::RenderingGateway;
use crate::resources::mapcatalog::AssetSource;
use crate::resources::playeroverlay::PlayerMarker;
use crate::resources::tacticalmap::TacticalMap;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

#[derive(Event, Debug, Clone, Default)]
pub struct ShowPlayersEvent {
    pub markers: Vec<PlayerMarker>,
}

pub fn show_players_observer<S, G>(
    trigger: On<ShowPlayersEvent>,
    mut map: ResMut<TacticalMap<S, G>>,
) where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    let issued = map.show_players(&trigger.event().markers);
    info!("Requested {} player marker(s)", issued);
}
