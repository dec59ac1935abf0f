//! Moderation Backend Module
//!
//! Admin-only operations over the auth and catalog stores:
//! - Ban a user: record the ban, then delete the account, its profile and
//!   its sessions. Unbanning lifts the ban only; the account stays gone.
//! - List users and bans
//! - Group profiles under the course they selected
//!
//! Every route sits behind `auth::require_admin`.

pub mod application;
pub mod error;
pub mod presentation;


// Re-exports for convenience
pub use error::{ModerationError, ModerationResult};
pub use presentation::router::{moderation_router, moderation_router_generic};
