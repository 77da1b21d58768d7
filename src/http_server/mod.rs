//! # HTTP Server Module
//!
//! axum surface of the moderation service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /dummyLogin`, `/register`, `/login` - Accounts and tokens
//! - `POST /house/create`, `GET /house/{id}`, `POST /house/{id}/subscribe` - Houses
//! - `POST /flat/create`, `/flat/update` - Flats and moderation

pub mod errors;
pub mod routes;
pub mod server;

pub use errors::ErrorResponse;
pub use routes::{moderation_routes, AppState};
pub use server::HttpServer;
