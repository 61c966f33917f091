//! Terminal UI module using ratatui.
//!
//! - `render`: login and dashboard screens
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
