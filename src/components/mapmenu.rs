use crate::resources::mapcatalog::MapAsset;
use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};

#[derive(Clone, Debug, PartialEq)]
pub struct MapMenuItem {
    /// Raw value sent with the selection; the asset's catalog key.
    pub value: String,
    pub label: String,
}

impl MapMenuItem {
    pub fn from_asset(asset: &MapAsset) -> Self {
        let label = asset
            .map_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| asset.name.clone());
        Self {
            value: asset.name.clone(),
            label,
        }
    }
}

/// Map picker drawn in the side panel.
#[derive(Component, Clone, Debug)]
pub struct MapMenu {
    pub items: Vec<MapMenuItem>,
    pub selected_index: usize,
    pub origin: Vector2,
    pub font_size: i32,
    pub item_spacing: f32,
    pub normal_color: Color,
    pub selected_color: Color,
}

impl MapMenu {
    pub fn new(assets: &[MapAsset], origin: Vector2, font_size: i32, item_spacing: f32) -> Self {
        Self {
            items: assets.iter().map(MapMenuItem::from_asset).collect(),
            selected_index: 0,
            origin,
            font_size,
            item_spacing,
            normal_color: Color::LIGHTGRAY,
            selected_color: Color::YELLOW,
        }
    }

    /// Move the highlight down, wrapping to the top.
    pub fn select_next(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.selected_index = (self.selected_index + 1) % self.items.len();
        true
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn select_previous(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.selected_index = (self.selected_index + self.items.len() - 1) % self.items.len();
        true
    }

    pub fn selected(&self) -> Option<&MapMenuItem> {
        self.items.get(self.selected_index)
    }

    /// Screen position of the item at `index`.
    pub fn item_position(&self, index: usize) -> Vector2 {
        Vector2 {
            x: self.origin.x,
            y: self.origin.y + index as f32 * self.item_spacing,
        }
    }
}
