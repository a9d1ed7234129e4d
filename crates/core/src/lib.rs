//! `mallgate-core` — identity building blocks for the admin console.
//!
//! This crate contains **pure data** primitives (no transport or storage concerns).

pub mod credentials;
pub mod id;
pub mod identity;

pub use credentials::Credentials;
pub use id::UserId;
pub use identity::{AccountStatus, UserIdentity};
