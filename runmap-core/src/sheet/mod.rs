//! Draggable bottom sheet state machine.

mod config;
mod controller;
mod level;

pub use config::SheetConfig;
pub use controller::SheetController;
pub use level::{SheetLevel, Step, step};
