//! Player marker overlay.
//!
//! [`PlayerOverlayManager::show_players`] turns an ordered list of
//! [`PlayerMarker`]s into draw requests. Sequence order is drawing order:
//! later markers occlude earlier ones where they overlap. Every call starts
//! with a marker clear, so each call re-specifies the complete visible set.

use crate::resources::gateway::{DrawRequest, RenderingGateway};
use log::debug;
use serde::{Deserialize, Serialize};

/// Color used when neither the marker nor the configuration provides one.
pub const DEFAULT_MARKER_COLOR: &str = "black";

/// A player's position on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMarker {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// View direction in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub scoped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,
}

impl PlayerMarker {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            color: None,
            rotation: None,
            scoped: false,
            health: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f32, scoped: bool) -> Self {
        self.rotation = Some(degrees);
        self.scoped = scoped;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    /// A player with a reported health of zero or less is dead.
    pub fn is_dead(&self) -> bool {
        self.health.is_some_and(|h| h <= 0.0)
    }
}

/// Marker color for a team index: 0 is red, 1 is blue, anything else black.
pub fn team_color(team: i32) -> &'static str {
    match team {
        0 => "red",
        1 => "blue",
        _ => DEFAULT_MARKER_COLOR,
    }
}

/// Issues one draw request per marker, in order.
#[derive(Debug, Clone)]
pub struct PlayerOverlayManager {
    default_color: String,
}

impl Default for PlayerOverlayManager {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_COLOR)
    }
}

impl PlayerOverlayManager {
    pub fn new(default_color: impl Into<String>) -> Self {
        Self {
            default_color: default_color.into(),
        }
    }

    /// Draw request for one marker.
    pub fn request_for(&self, marker: &PlayerMarker) -> DrawRequest {
        let color = marker
            .color
            .clone()
            .unwrap_or_else(|| self.default_color.clone());
        DrawRequest {
            rotation: marker.rotation,
            scoped: marker.scoped,
            dead: marker.is_dead(),
            ..DrawRequest::new(marker.id, marker.x, marker.y, color)
        }
    }

    /// Replace the visible markers with `markers`, drawn in sequence order.
    ///
    /// Returns the number of draw requests issued.
    pub fn show_players(
        &self,
        markers: &[PlayerMarker],
        gateway: &mut impl RenderingGateway,
    ) -> usize {
        gateway.clear_markers();
        for marker in markers {
            gateway.draw_marker(self.request_for(marker));
        }
        debug!("Issued {} marker draw request(s)", markers.len());
        markers.len()
    }
}
