//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Randomness and constant-time comparison
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Outbound mail dispatch
//! - Upload storage on local disk

pub mod cookie;
pub mod crypto;
pub mod mail;
pub mod password;
pub mod upload;
