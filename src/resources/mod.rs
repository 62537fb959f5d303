//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world: the
//! viewer's controllers and the rendering engine they drive. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `debugmode` – presence toggles the debug overlay
//! - `enginebridge` – channels and loader thread between core and engine
//! - `gateway` – rendering gateway contract and the readiness gate
//! - `input` – per-frame keyboard state of keys relevant to the viewer
//! - `mapcatalog` – enumerates the selectable map assets
//! - `mapname` – canonical map names and their two parsers
//! - `maprenderer` – texture and markers currently on screen
//! - `mapselection` – which map is loaded and when to switch
//! - `playerfeed` – source of player frames (file, demo or fixed)
//! - `playeroverlay` – turns player positions into draw requests
//! - `tacticalmap` – the controller tying catalog, selection and overlay together
//! - `viewerconfig` – INI-backed window, asset and marker settings
pub mod debugmode;
pub mod enginebridge;
pub mod gateway;
pub mod input;
pub mod mapcatalog;
pub mod mapname;
pub mod maprenderer;
pub mod mapselection;
pub mod playerfeed;
pub mod playeroverlay;
pub mod tacticalmap;
pub mod viewerconfig;
