//! `mallgate-session` — session lifecycle and permission bootstrap.
//!
//! [`SessionManager`] owns the one mutable session of the application. It is
//! an explicit value created by the application root and shared by `Arc` into
//! the guard and UI layers; there is no module-level singleton. All network
//! access goes through the [`AuthService`]/[`MenuService`] collaborators, and
//! the permission bootstrap is single-flight: concurrent callers collapse
//! into one round-trip and one route registration.

pub mod error;
pub mod manager;
pub mod services;
pub mod session;
pub mod token;

pub use error::{AuthError, BootstrapError};
pub use manager::SessionManager;
pub use services::{AuthService, LoginPayload, MenuService};
pub use session::{PhaseError, Session, SessionPhase};
pub use token::{InMemoryTokenStore, TokenStore, PERSISTED_TOKEN_TTL_DAYS};
