//! Debug overlay toggle.
//!
//! The presence of this resource enables the renderer's diagnostics panel
//! (frame rate, engine lifecycle, queued calls and marker count).

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, the debug overlay is drawn.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DebugMode {}
