//! Viewer configuration resource.
//!
//! Settings are loaded from an INI file. Every key is optional; missing keys
//! keep the defaults below.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 800
//! target_fps = 60
//!
//! [assets]
//! dir = ./assets
//! url_base = http://127.0.0.1:8080/images
//!
//! [markers]
//! radius = 10
//! default_color = black
//! labels = true
//! ```

use crate::resources::playeroverlay::DEFAULT_MARKER_COLOR;
use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 800;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_ASSETS_DIR: &str = "./assets";
const DEFAULT_URL_BASE: &str = "http://127.0.0.1:8080/images";
const DEFAULT_MARKER_RADIUS: f32 = 10.0;
const DEFAULT_SHOW_LABELS: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Viewer configuration.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Directory scanned for `.png` maps.
    pub assets_dir: PathBuf,
    /// Prefix of the resolved map URLs.
    pub url_base: String,
    /// Marker circle radius in map pixels.
    pub marker_radius: f32,
    /// Color for markers that carry none.
    pub default_marker_color: String,
    /// Draw player ids next to markers.
    pub show_labels: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            url_base: DEFAULT_URL_BASE.to_string(),
            marker_radius: DEFAULT_MARKER_RADIUS,
            default_marker_color: DEFAULT_MARKER_COLOR.to_string(),
            show_labels: DEFAULT_SHOW_LABELS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration that reads from a custom file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [assets] section
        if let Some(dir) = config.get("assets", "dir") {
            self.assets_dir = PathBuf::from(dir);
        }
        if let Some(url_base) = config.get("assets", "url_base") {
            self.url_base = url_base;
        }

        // [markers] section
        if let Some(radius) = config.getfloat("markers", "radius").ok().flatten() {
            self.marker_radius = radius as f32;
        }
        if let Some(color) = config.get("markers", "default_color") {
            self.default_marker_color = color;
        }
        if let Some(labels) = config.getbool("markers", "labels").ok().flatten() {
            self.show_labels = labels;
        }

        info!(
            "Loaded config: {}x{} window, fps={}, assets={:?}, marker radius={}, labels={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.assets_dir,
            self.marker_radius,
            self.show_labels
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config.set(
            "assets",
            "dir",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );
        config.set("assets", "url_base", Some(self.url_base.clone()));

        config.set("markers", "radius", Some(self.marker_radius.to_string()));
        config.set(
            "markers",
            "default_color",
            Some(self.default_marker_color.clone()),
        );
        config.set("markers", "labels", Some(self.show_labels.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
