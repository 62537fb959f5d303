//! Event types and observers used by the viewer.
//!
//! Events decouple the input layer from the controllers: key presses become
//! [`input::InputEvent`]s, the menu turns those into a map selection, and the
//! observers here call into the
//! [`TacticalMap`](crate::resources::tacticalmap::TacticalMap) controller.
//!
//! Submodules:
//! - [`engine`] – commands and messages exchanged with the rendering engine
//! - [`input`] – logical viewer actions pressed or released this frame
//! - [`mapselection`] – "show selected map" requests
//! - [`showplayers`] – "show players" requests carrying one player frame
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod engine;
pub mod input;
pub mod mapselection;
pub mod showplayers;
pub mod switchdebug;
