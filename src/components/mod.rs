//! ECS components.
//!
//! - `mapmenu` – selectable list of catalog maps shown in the side panel
pub mod mapmenu;
