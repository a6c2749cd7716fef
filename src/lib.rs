//! Dashboard of Indonesian higher-education institutions per province.
//!
//! `data` holds the load → filter → aggregate → choropleth pipeline and is
//! free of any UI dependency; the remaining modules render it with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
