//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::ModerationAppState;
pub use router::{moderation_router, moderation_router_generic};
