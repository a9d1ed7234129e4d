use thiserror::Error;

use mallgate_routing::BuildError;

use crate::session::PhaseError;

/// Authentication/session error surfaced by the auth collaborator or the
/// session lifecycle itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token in the store; the caller must go through login.
    #[error("no persisted token")]
    MissingToken,

    /// The backend rejected the token (expired, revoked, malformed).
    #[error("token rejected: {0}")]
    TokenInvalid(String),

    /// Transport-level failure. Timeouts are the transport's concern and
    /// arrive here as ordinary failures.
    #[error("network failure: {0}")]
    Network(String),

    #[error(transparent)]
    Phase(#[from] PhaseError),
}

/// Failure of the one-time permission bootstrap.
///
/// Always fail-closed: a bootstrap error grants nothing and the session is
/// reset before the error reaches the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("bootstrap fetch failed: {0}")]
    Fetch(#[from] AuthError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Phase(#[from] PhaseError),
}
