//! Messages exchanged between the viewer core and the rendering engine.
//!
//! - [`RenderCmd`] flows core -> engine through
//!   [`ChannelGateway`](crate::resources::enginebridge::ChannelGateway).
//! - [`EngineMessage`] flows from the engine's loader thread back to the main
//!   loop, announcing whether the engine became usable.

use crate::resources::gateway::DrawRequest;
use rustc_hash::FxHashMap;
use std::path::PathBuf;

/// Commands sent *to* the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCmd {
    LoadMap { url: String },
    ChangeMap { url: String },
    /// Start a new marker frame; everything drawn before disappears.
    ClearMarkers,
    DrawMarker(DrawRequest),
}

/// Messages sent *back* from the engine loader.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    /// Assets were indexed; keys and resolved URLs map to files on disk.
    Ready {
        index: FxHashMap<String, PathBuf>,
    },
    /// The engine cannot be used.
    Failed { error: String },
}
