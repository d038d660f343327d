//! Terminal viewer and editor for tables, with fixed-width formatting.
//!
//! Values are formatted by [`fixfmt`] into cells of a known width, laid out
//! by [`layout`], and projected into screen runs by [`render`]. [`view`]
//! keeps the cursor and scroll position consistent as the table and the
//! terminal change.

pub mod column;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod fixfmt;
pub mod handlers;
pub mod io;
pub mod keymap;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod state;
pub mod text;
pub mod view;
