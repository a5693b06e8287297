//! handmenu - hand-gesture driven on-screen menu.
//!
//! Turns per-frame hand landmarks into a debounced stream of pointer
//! actions and feeds them to a headless radial menu session.

pub mod actuator;
pub mod app;
pub mod config;
pub mod menu;
pub mod pipeline;
pub mod sexp;
pub mod tracking;
