//! Place-finder screen for runners: nearby running courses and cafés on a
//! map, a draggable list sheet and walking routes to the selected place.
//!
//! The building blocks live in [`runmap_core`]; this crate wires them into
//! one [`MapScreen`].

mod config;
mod screen;

pub use config::ScreenConfig;
pub use runmap_core::prelude;
pub use screen::MapScreen;
