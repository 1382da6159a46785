//! This module is responsible for loading place catalogues from disk.

mod catalogue;

pub use catalogue::{load_catalogues, load_places};
