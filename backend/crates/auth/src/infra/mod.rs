//! Infrastructure Layer
//!
//! Database implementations and in-process stores.

pub mod memory;
pub mod otp_store;
pub mod postgres;

pub use memory::InMemoryAuthRepository;
pub use otp_store::InMemoryOtpStore;
pub use postgres::PgAuthRepository;
