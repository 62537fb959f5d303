//! Source of player frames for the "show players" action.
//!
//! A frame is a complete list of [`PlayerMarker`]s. Frames come from one of:
//! - a JSON file in the columnar layout of the live data feed, re-read on
//!   every request so edits show up on the next action
//! - a demo generator producing random positions
//! - a fixed two-player set
//!
//! # Frame format
//!
//! ```json
//! {
//!   "players": {
//!     "id":   [1, 2],
//!     "x":    [250.0, 300.0],
//!     "y":    [250.0, 300.0],
//!     "team": [0, 1]
//!   }
//! }
//! ```
//!
//! The `players` wrapper is optional. A `colour` (or `color`) column overrides
//! the team color per player. Optional `rotation` (degrees), `scoped` (0/1)
//! and `health` columns drive the view line and death markers.

use crate::resources::playeroverlay::{PlayerMarker, team_color};
use bevy_ecs::prelude::Resource;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a player frame.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot read player frame {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid player frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{column}' has {found} entries, expected {expected}")]
    ColumnMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Columnar player data, one vector per attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerColumns {
    pub id: Vec<u32>,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    #[serde(default)]
    pub team: Vec<i32>,
    #[serde(default, alias = "color")]
    pub colour: Vec<String>,
    /// View direction in degrees.
    #[serde(default)]
    pub rotation: Vec<f32>,
    /// 1 while the player is scoped in.
    #[serde(default)]
    pub scoped: Vec<i32>,
    #[serde(default)]
    pub health: Vec<f32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameDocument {
    Wrapped { players: PlayerColumns },
    Bare(PlayerColumns),
}

impl PlayerColumns {
    /// Zip the columns into markers. Every column but `id`, `x` and `y` may
    /// be omitted.
    pub fn into_markers(self) -> Result<Vec<PlayerMarker>, FeedError> {
        let expected = self.id.len();
        check_column("x", expected, self.x.len())?;
        check_column("y", expected, self.y.len())?;
        check_optional_column("team", expected, self.team.len())?;
        check_optional_column("colour", expected, self.colour.len())?;
        check_optional_column("rotation", expected, self.rotation.len())?;
        check_optional_column("scoped", expected, self.scoped.len())?;
        check_optional_column("health", expected, self.health.len())?;

        let markers = (0..expected)
            .map(|i| {
                let color = self
                    .colour
                    .get(i)
                    .cloned()
                    .or_else(|| self.team.get(i).map(|t| team_color(*t).to_string()));
                PlayerMarker {
                    id: self.id[i],
                    x: self.x[i],
                    y: self.y[i],
                    color,
                    rotation: self.rotation.get(i).copied(),
                    scoped: self.scoped.get(i) == Some(&1),
                    health: self.health.get(i).copied(),
                }
            })
            .collect();
        Ok(markers)
    }
}

fn check_column(column: &'static str, expected: usize, found: usize) -> Result<(), FeedError> {
    if expected != found {
        return Err(FeedError::ColumnMismatch {
            column,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_optional_column(
    column: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), FeedError> {
    if found == 0 {
        return Ok(());
    }
    check_column(column, expected, found)
}

/// Parse a JSON player frame.
pub fn parse_frame(json: &str) -> Result<Vec<PlayerMarker>, FeedError> {
    let columns = match serde_json::from_str::<FrameDocument>(json)? {
        FrameDocument::Wrapped { players } => players,
        FrameDocument::Bare(columns) => columns,
    };
    columns.into_markers()
}

/// Where player frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    File(PathBuf),
    Demo { count: usize, width: f32, height: f32 },
    Fixed,
}

/// Player frame provider.
#[derive(Resource, Debug)]
pub struct PlayerFeed {
    source: FeedSource,
    rng: fastrand::Rng,
}

impl Default for PlayerFeed {
    fn default() -> Self {
        Self::new(FeedSource::Fixed)
    }
}

impl PlayerFeed {
    pub fn new(source: FeedSource) -> Self {
        Self {
            source,
            rng: fastrand::Rng::new(),
        }
    }

    /// Demo feed with a fixed seed, for reproducible frames.
    pub fn seeded(source: FeedSource, seed: u64) -> Self {
        Self {
            source,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Produce the next complete frame.
    pub fn next_frame(&mut self) -> Result<Vec<PlayerMarker>, FeedError> {
        match &self.source {
            FeedSource::File(path) => {
                let json = fs::read_to_string(path).map_err(|source| FeedError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_frame(&json)
            }
            FeedSource::Demo {
                count,
                width,
                height,
            } => Ok(demo_frame(&mut self.rng, *count, *width, *height)),
            FeedSource::Fixed => Ok(fixed_frame()),
        }
    }
}

/// Two players near the middle of a 500px map, one per team.
pub fn fixed_frame() -> Vec<PlayerMarker> {
    vec![
        PlayerMarker::new(1, 250.0, 250.0).with_color(team_color(0)),
        PlayerMarker::new(2, 300.0, 300.0).with_color(team_color(1)),
    ]
}

fn demo_frame(rng: &mut fastrand::Rng, count: usize, width: f32, height: f32) -> Vec<PlayerMarker> {
    (0..count)
        .map(|i| {
            let team = rng.i32(0..2);
            PlayerMarker::new(i as u32 + 1, rng.f32() * width, rng.f32() * height)
                .with_color(team_color(team))
                .with_rotation(rng.f32() * 360.0, rng.u8(0..4) == 0)
                .with_health(100.0)
        })
        .collect()
}
