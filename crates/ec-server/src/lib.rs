//! JSON HTTP API for the EC site.
//!
//! Wires the catalog, cart, order and auth services into an axum router.
//! Every response uses the [`envelope::ApiResponse`] shape.
//!
//! # Example
//!
//! ```rust,ignore
//! use ec_server::{build_router, AppState, ServerConfig};
//!
//! let state = AppState::new(ServerConfig::default())?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, build_router(state)).await?;
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use logging::{init_logging, LogFormat};
pub use routes::build_router;
pub use state::AppState;
