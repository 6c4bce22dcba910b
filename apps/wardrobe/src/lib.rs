//! # wardrobe
//!
//! Application layer of Wardrobe: HTTP API, CLI, configuration and the
//! imager bridge. All catalog logic lives in `wardrobe-core`.

pub mod api;
pub mod cli;
pub mod config;
pub mod imager;
