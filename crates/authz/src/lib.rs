//! `mallgate-authz` — pure authorization boundary for the admin console.
//!
//! This crate is intentionally decoupled from transport, storage and the
//! route tree. It answers one question: given the capabilities a session
//! carries, which role/permission requirements does it satisfy?

pub mod permissions;
pub mod resolver;
pub mod roles;

pub use permissions::Permission;
pub use resolver::PermissionSet;
pub use roles::Role;
