use serde::{Deserialize, Serialize};
use thiserror::Error;

use mallgate_authz::PermissionSet;
use mallgate_core::UserIdentity;

/// Lifecycle phase of the session.
///
/// Phases only ever advance forward, one step at a time:
/// `Anonymous → Authenticating → Authenticated → PermissionsLoading → Ready`.
/// Every failure path goes back to `Anonymous` through a full reset, never by
/// stepping backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    PermissionsLoading,
    Ready,
}

impl SessionPhase {
    fn rank(self) -> u8 {
        match self {
            SessionPhase::Anonymous => 0,
            SessionPhase::Authenticating => 1,
            SessionPhase::Authenticated => 2,
            SessionPhase::PermissionsLoading => 3,
            SessionPhase::Ready => 4,
        }
    }

    /// Whether `next` is the immediate successor of this phase.
    pub fn can_advance_to(self, next: SessionPhase) -> bool {
        next.rank() == self.rank() + 1
    }
}

impl core::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionPhase::Anonymous => write!(f, "anonymous"),
            SessionPhase::Authenticating => write!(f, "authenticating"),
            SessionPhase::Authenticated => write!(f, "authenticated"),
            SessionPhase::PermissionsLoading => write!(f, "permissions_loading"),
            SessionPhase::Ready => write!(f, "ready"),
        }
    }
}

/// Attempted phase transition that is not the immediate forward step.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("session phase cannot move from {from} to {to}")]
pub struct PhaseError {
    pub from: SessionPhase,
    pub to: SessionPhase,
}

/// The one mutable session of the application.
///
/// Owned exclusively by [`SessionManager`]; everything outside that type sees
/// read-only snapshots.
///
/// [`SessionManager`]: crate::manager::SessionManager
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) token: Option<String>,
    pub(crate) user: Option<UserIdentity>,
    pub(crate) grants: PermissionSet,
    pub(crate) remembered: bool,
    pub(crate) phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_token(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn grants(&self) -> &PermissionSet {
        &self.grants
    }

    pub fn remembered(&self) -> bool {
        self.remembered
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Advance to the immediate next phase.
    pub(crate) fn advance_to(&mut self, next: SessionPhase) -> Result<(), PhaseError> {
        if !self.phase.can_advance_to(next) {
            return Err(PhaseError {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Unconditional wipe back to `Anonymous`.
    pub(crate) fn reset(&mut self) {
        *self = Session::default();
    }
}
