//! Rendering systems.
//!
//! - [`apply_render_cmds`] drains the gateway's [`RenderCmd`]s on the main
//!   thread, loading map textures and collecting markers.
//! - [`render_system`] draws the map list, the current map with its markers,
//!   and the debug overlay when [`DebugMode`] is present.

use bevy_ecs::prelude::*;
use log::{error, info};
use raylib::prelude::*;

use crate::components::mapmenu::MapMenu;
use crate::events::engine::RenderCmd;
use crate::resources::debugmode::DebugMode;
use crate::resources::enginebridge::{AssetIndex, EngineBridge};
use crate::resources::gateway::RenderingGateway;
use crate::resources::mapcatalog::AssetSource;
use crate::resources::maprenderer::{
    MapRenderer, MapViewport, MarkerStyle, parse_color, view_line_end,
};
use crate::resources::tacticalmap::TacticalMap;

/// Width of the map list on the left of the window.
pub const PANEL_WIDTH: i32 = 200;
const MAP_MARGIN: f32 = 10.0;
const VIEW_LINE_THICKNESS: f32 = 3.0;

/// Execute pending engine commands against the renderer.
pub fn apply_render_cmds(
    bridge: Res<EngineBridge>,
    index: Res<AssetIndex>,
    mut renderer: NonSendMut<MapRenderer>,
    mut rl: NonSendMut<RaylibHandle>,
    th: NonSend<RaylibThread>,
) {
    for cmd in bridge.rx_cmd.try_iter() {
        match cmd {
            RenderCmd::LoadMap { url } | RenderCmd::ChangeMap { url } => {
                let Some(path) = index.resolve(&url) else {
                    error!("[engine] unknown map reference '{}'", url);
                    continue;
                };
                let Some(path_str) = path.to_str() else {
                    error!("[engine] map path {:?} is not valid UTF-8", path);
                    continue;
                };
                match rl.load_texture(&th, path_str) {
                    Ok(texture) => {
                        info!(
                            "[engine] showing {} ({}x{})",
                            url, texture.width, texture.height
                        );
                        renderer.set_map(texture);
                    }
                    Err(e) => error!("[engine] failed to load {:?}: {}", path, e),
                }
            }
            RenderCmd::ClearMarkers => renderer.clear_markers(),
            RenderCmd::DrawMarker(request) => renderer.draw_marker(request),
        }
    }
}

/// Draw one frame.
pub fn render_system<S, G>(
    mut rl: NonSendMut<RaylibHandle>,
    th: NonSend<RaylibThread>,
    renderer: NonSend<MapRenderer>,
    style: Res<MarkerStyle>,
    map: Res<TacticalMap<S, G>>,
    menus: Query<&MapMenu>,
    debug_mode: Option<Res<DebugMode>>,
) where
    S: AssetSource + Send + Sync + 'static,
    G: RenderingGateway + Send + Sync + 'static,
{
    let screen_w = rl.get_screen_width();
    let screen_h = rl.get_screen_height();
    let mut d = rl.begin_drawing(&th);
    d.clear_background(Color::DARKGRAY);

    // Map area
    if let Some(texture) = renderer.texture() {
        let tex_w = texture.width as f32;
        let tex_h = texture.height as f32;
        let vp = MapViewport::fit(
            PANEL_WIDTH as f32 + MAP_MARGIN,
            MAP_MARGIN,
            (screen_w - PANEL_WIDTH) as f32 - 2.0 * MAP_MARGIN,
            screen_h as f32 - 2.0 * MAP_MARGIN,
            tex_w,
            tex_h,
        );
        let src = Rectangle {
            x: 0.0,
            y: 0.0,
            width: tex_w,
            height: tex_h,
        };
        let dest = Rectangle {
            x: vp.x,
            y: vp.y,
            width: tex_w * vp.scale,
            height: tex_h * vp.scale,
        };
        d.draw_texture_pro(texture, src, dest, Vector2::zero(), 0.0, Color::WHITE);

        let radius = (style.radius * vp.scale).max(3.0);
        for death in renderer.markers().deaths() {
            let center = vp.to_screen(death.x, death.y);
            let color = Color::new(255, 255, 255, (death.alpha() * 255.0) as u8);
            d.draw_line_ex(
                Vector2::new(center.x - radius, center.y - radius),
                Vector2::new(center.x + radius, center.y + radius),
                2.0,
                color,
            );
            d.draw_line_ex(
                Vector2::new(center.x - radius, center.y + radius),
                Vector2::new(center.x + radius, center.y - radius),
                2.0,
                color,
            );
        }
        for marker in renderer.markers().iter() {
            let center = vp.to_screen(marker.x, marker.y);
            let color = parse_color(&marker.color);
            if let Some((end_x, end_y)) = view_line_end(marker) {
                d.draw_line_ex(center, vp.to_screen(end_x, end_y), VIEW_LINE_THICKNESS, color);
            }
            d.draw_circle_v(center, radius, color);
            d.draw_circle_lines(center.x as i32, center.y as i32, radius, Color::WHITE);
            if style.show_labels {
                d.draw_text(
                    &marker.id.to_string(),
                    (center.x + radius + 2.0) as i32,
                    (center.y - radius) as i32,
                    14,
                    Color::WHITE,
                );
            }
        }
    } else {
        d.draw_text(
            "No map loaded",
            PANEL_WIDTH + 20,
            screen_h / 2,
            20,
            Color::LIGHTGRAY,
        );
    }

    // Map list
    d.draw_rectangle(0, 0, PANEL_WIDTH, screen_h, Color::BLACK);
    d.draw_text("MAPS", 10, 10, 20, Color::WHITE);
    let current = map.current_map().current_name.as_ref();
    for menu in menus.iter() {
        for (i, item) in menu.items.iter().enumerate() {
            let pos = menu.item_position(i);
            let color = if i == menu.selected_index {
                menu.selected_color
            } else {
                menu.normal_color
            };
            let shown = current.is_some_and(|name| name.as_str() == item.label);
            let text = if shown {
                format!("> {}", item.label)
            } else {
                format!("  {}", item.label)
            };
            d.draw_text(&text, pos.x as i32, pos.y as i32, menu.font_size, color);
        }
    }
    d.draw_text(
        "Enter: show  P: players  L: labels",
        10,
        screen_h - 20,
        10,
        Color::GRAY,
    );

    if debug_mode.is_some() {
        let lines = [
            format!("DEBUG (F11) | FPS: {}", d.get_fps()),
            format!("Engine: {:?}", map.lifecycle()),
            format!(
                "Map: {}",
                current.map(|n| n.as_str()).unwrap_or("<none>")
            ),
            format!("Queued calls: {}", map.gate().pending().len()),
            format!(
                "Markers: {} (+{} dead)",
                renderer.markers().len(),
                renderer.markers().deaths().len()
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            d.draw_text(
                line,
                PANEL_WIDTH + 10,
                10 + i as i32 * 14,
                12,
                Color::YELLOW,
            );
        }
    }
}
