//! Tactical map viewer library.
//!
//! This module exposes the viewer's ECS components, resources, systems, and events
//! for use in integration tests and as a reusable library.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
