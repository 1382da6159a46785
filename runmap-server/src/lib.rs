//! HTTP service for nearby running courses and cafés and walking routes
//! to them.

pub mod config;
pub mod directions;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
