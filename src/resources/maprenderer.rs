//! Rendering engine state.
//!
//! [`MapRenderer`] is the engine side of the gateway: it owns the background
//! texture currently on screen and the markers drawn on top of it. Markers
//! come in frames: a clear starts a new one, and dead players fade out over
//! the next few frames.
//!
//! Note: This is a non-send resource because Raylib textures must be accessed
//! from the main thread only.

use crate::resources::gateway::DrawRequest;
use bevy_ecs::prelude::Resource;
use log::debug;
use raylib::prelude::{Color, Texture2D, Vector2};
use rustc_hash::FxHashSet;

/// Marker drawing options shared by the renderer and input observers.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Circle radius in map pixels.
    pub radius: f32,
    /// Draw the player id on each marker.
    pub show_labels: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 10.0,
            show_labels: true,
        }
    }
}

/// Marker frames a death marker stays on screen.
pub const DEATH_MARKER_FRAMES: u8 = 5;
const DEATH_ALPHA_STEP: f32 = 0.2;

/// Length in map pixels of a player's view line.
pub const VIEW_LINE_LENGTH: f32 = 30.0;
/// Extra view line length while scoped.
pub const SCOPED_VIEW_LINE_BONUS: f32 = 20.0;

/// Fading marker left where a player died.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathMarker {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub frames_left: u8,
}

impl DeathMarker {
    /// Opacity in `0.0..=1.0`, fading by one step per marker frame.
    pub fn alpha(&self) -> f32 {
        (DEATH_ALPHA_STEP * self.frames_left as f32).min(1.0)
    }
}

/// Markers of the current frame plus the death markers still fading out.
#[derive(Debug, Default, Clone)]
pub struct MarkerLayer {
    markers: Vec<DrawRequest>,
    deaths: Vec<DeathMarker>,
    dead_ids: FxHashSet<u32>,
}

impl MarkerLayer {
    /// Start a new marker frame: live markers go away and death markers age.
    pub fn begin_frame(&mut self) {
        self.markers.clear();
        for death in self.deaths.iter_mut() {
            death.frames_left = death.frames_left.saturating_sub(1);
        }
        self.deaths.retain(|d| d.frames_left > 0);
    }

    /// Add a marker to the current frame.
    ///
    /// A dead player leaves one death marker, placed the first frame it is
    /// reported dead. It shows up as alive again once reported alive.
    pub fn push(&mut self, request: DrawRequest) {
        if request.dead {
            if self.dead_ids.insert(request.id) {
                self.deaths.push(DeathMarker {
                    id: request.id,
                    x: request.x,
                    y: request.y,
                    frames_left: DEATH_MARKER_FRAMES,
                });
            }
        } else {
            self.dead_ids.remove(&request.id);
            self.markers.push(request);
        }
    }

    /// Drop everything, including death markers.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.deaths.clear();
        self.dead_ids.clear();
    }

    /// Live markers in drawing order; later entries are painted over earlier ones.
    pub fn iter(&self) -> impl Iterator<Item = &DrawRequest> {
        self.markers.iter()
    }

    pub fn deaths(&self) -> &[DeathMarker] {
        &self.deaths
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// End of a marker's view line in map pixels, if it has a direction.
///
/// Degrees turn clockwise from the +x axis, matching the y-down map space.
pub fn view_line_end(request: &DrawRequest) -> Option<(f32, f32)> {
    let degrees = request.rotation?;
    let mut length = VIEW_LINE_LENGTH;
    if request.scoped {
        length += SCOPED_VIEW_LINE_BONUS;
    }
    let angle = degrees.to_radians();
    Some((
        request.x + length * angle.cos(),
        request.y + length * angle.sin(),
    ))
}

/// Where the map is painted inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl MapViewport {
    /// Fit a `tex_w` x `tex_h` image into the area, keeping its aspect ratio
    /// and centering it.
    pub fn fit(area_x: f32, area_y: f32, area_w: f32, area_h: f32, tex_w: f32, tex_h: f32) -> Self {
        if tex_w <= 0.0 || tex_h <= 0.0 {
            return Self {
                x: area_x,
                y: area_y,
                scale: 1.0,
            };
        }
        let scale = (area_w / tex_w).min(area_h / tex_h).max(0.0);
        Self {
            x: area_x + (area_w - tex_w * scale) / 2.0,
            y: area_y + (area_h - tex_h * scale) / 2.0,
            scale,
        }
    }

    /// Window position of a point given in map pixels.
    pub fn to_screen(&self, x: f32, y: f32) -> Vector2 {
        Vector2 {
            x: self.x + x * self.scale,
            y: self.y + y * self.scale,
        }
    }
}

/// Background texture and marker layer on screen.
pub struct MapRenderer {
    texture: Option<Texture2D>,
    markers: MarkerLayer,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            texture: None,
            markers: MarkerLayer::default(),
        }
    }

    /// Replace the background map. Markers drawn on the old map are cleared.
    pub fn set_map(&mut self, texture: Texture2D) {
        self.texture = Some(texture);
        self.markers.clear();
    }

    pub fn clear_markers(&mut self) {
        self.markers.begin_frame();
    }

    pub fn draw_marker(&mut self, request: DrawRequest) {
        debug!(
            "[engine] marker {} at ({}, {}) {}",
            request.id, request.x, request.y, request.color
        );
        self.markers.push(request);
    }

    pub fn texture(&self) -> Option<&Texture2D> {
        self.texture.as_ref()
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }
}

/// Parse a CSS-style color: a handful of names or `#rrggbb`.
///
/// Unknown values render black.
pub fn parse_color(value: &str) -> Color {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() == 6 {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                return Color::new(r, g, b, 255);
            }
        }
        debug!("unparseable color '{}', using black", value);
        return Color::BLACK;
    }
    match value.to_ascii_lowercase().as_str() {
        "red" => Color::RED,
        "blue" => Color::BLUE,
        "green" => Color::GREEN,
        "yellow" => Color::YELLOW,
        "orange" => Color::ORANGE,
        "purple" => Color::PURPLE,
        "white" => Color::WHITE,
        "gray" | "grey" => Color::GRAY,
        "black" => Color::BLACK,
        _ => {
            debug!("unknown color '{}', using black", value);
            Color::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn req(id: u32) -> DrawRequest {
        DrawRequest::new(id, 0.0, 0.0, "red")
    }

    fn dead(id: u32) -> DrawRequest {
        DrawRequest {
            dead: true,
            ..req(id)
        }
    }

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("red"), Color::RED);
        assert_eq!(parse_color("Blue"), Color::BLUE);
        assert_eq!(parse_color(" black "), Color::BLACK);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#00ff80"), Color::new(0, 255, 128, 255));
        assert_eq!(parse_color("#zzzzzz"), Color::BLACK);
        assert_eq!(parse_color("#fff"), Color::BLACK);
    }

    #[test]
    fn unknown_color_is_black() {
        assert_eq!(parse_color("chartreuse-ish"), Color::BLACK);
    }

    #[test]
    fn viewport_fits_wide_area() {
        let vp = MapViewport::fit(0.0, 0.0, 1000.0, 500.0, 1000.0, 1000.0);
        assert!(approx_eq(vp.scale, 0.5));
        assert!(approx_eq(vp.x, 250.0));
        assert!(approx_eq(vp.y, 0.0));
        let p = vp.to_screen(500.0, 500.0);
        assert!(approx_eq(p.x, 500.0));
        assert!(approx_eq(p.y, 250.0));
    }

    #[test]
    fn viewport_handles_empty_texture() {
        let vp = MapViewport::fit(200.0, 0.0, 800.0, 600.0, 0.0, 0.0);
        assert_eq!(
            vp,
            MapViewport {
                x: 200.0,
                y: 0.0,
                scale: 1.0
            }
        );
    }

    #[test]
    fn marker_layer_keeps_draw_order() {
        let mut layer = MarkerLayer::default();
        layer.push(req(2));
        layer.push(req(1));
        let ids: Vec<u32> = layer.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        layer.clear();
        assert!(layer.is_empty());
    }

    #[test]
    fn second_frame_replaces_the_first() {
        let mut renderer = MapRenderer::new();
        renderer.clear_markers();
        for id in 1..=10 {
            renderer.draw_marker(req(id));
        }
        renderer.clear_markers();
        for id in 11..=20 {
            renderer.draw_marker(req(id));
        }
        let ids: Vec<u32> = renderer.markers().iter().map(|m| m.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<u32>>());
    }

    #[test]
    fn death_marker_fades_over_frames() {
        let mut layer = MarkerLayer::default();
        layer.push(dead(3));
        assert!(layer.is_empty());
        assert_eq!(layer.deaths().len(), 1);
        assert!((layer.deaths()[0].alpha() - 1.0).abs() < EPSILON);

        // still reported dead: no second marker
        layer.begin_frame();
        layer.push(dead(3));
        assert_eq!(layer.deaths().len(), 1);
        assert!(approx_eq(layer.deaths()[0].alpha(), 0.8));

        for _ in 1..DEATH_MARKER_FRAMES {
            layer.begin_frame();
        }
        assert!(layer.deaths().is_empty());
    }

    #[test]
    fn respawned_player_can_die_again() {
        let mut layer = MarkerLayer::default();
        layer.push(dead(4));
        layer.begin_frame();
        layer.push(req(4));
        assert_eq!(layer.len(), 1);
        layer.begin_frame();
        layer.push(dead(4));
        assert_eq!(layer.deaths().len(), 2);
    }

    #[test]
    fn view_line_follows_rotation() {
        let mut request = DrawRequest {
            rotation: Some(90.0),
            ..DrawRequest::new(1, 100.0, 100.0, "red")
        };
        let (x, y) = view_line_end(&request).unwrap();
        assert!(approx_eq(x, 100.0));
        assert!(approx_eq(y, 130.0));

        request.scoped = true;
        request.rotation = Some(180.0);
        let (x, y) = view_line_end(&request).unwrap();
        assert!(approx_eq(x, 50.0));
        assert!(approx_eq(y, 100.0));

        assert_eq!(view_line_end(&req(2)), None);
    }

    #[test]
    fn renderer_without_map_still_collects_markers() {
        let mut renderer = MapRenderer::new();
        renderer.draw_marker(req(1));
        assert!(renderer.texture().is_none());
        assert_eq!(renderer.markers().len(), 1);
    }
}
