//! # Moderation Module
//!
//! The moderation and authorization core:
//!
//! - [`guard`]: resolves the caller's role and moderator identity
//! - [`state_machine`]: status transitions and the single-moderator claim
//! - [`visibility`]: which flats each role may see
//! - [`gate`]: the serialization point for all writes
//! - [`service`]: the operations exposed to the HTTP layer

pub mod errors;
pub mod gate;
pub mod guard;
pub mod service;
pub mod state_machine;
pub mod visibility;

pub use errors::{ModerationError, ModerationResult};
pub use gate::WriteGate;
pub use guard::{bearer_token, AuthGuard, ModeratorId};
pub use service::{LoginRequest, ModerationService, NewFlat, NewHouse, RegisterRequest};
pub use state_machine::{apply_transition, TransitionRequest};
pub use visibility::filter_visible;
