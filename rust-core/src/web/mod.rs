//! Upload page and HTTP surface

pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod retention;
pub mod server;

pub use config::{ArtifactNaming, ServerConfig};
pub use error::AppError;
pub use server::{build_router, AppState, WebServer};
