//! ECS systems and observers that run each frame.
//!
//! - `engine` – loader thread and readiness polling
//! - `input` – keyboard polling and input events
//! - `mapmenu` – map menu navigation and viewer action observers
//! - `render` – render command execution and frame drawing
pub mod engine;
pub mod input;
pub mod mapmenu;
pub mod render;
