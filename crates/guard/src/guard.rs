use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use mallgate_authz::{Permission, PermissionSet, Role};
use mallgate_session::SessionManager;

use crate::config::GuardConfig;
use crate::decision::Decision;

/// Per-navigation access decision state machine.
///
/// One decision is computed per navigation event. The evaluation suspends at
/// the network-bound steps (session restore, permission bootstrap); when a
/// newer navigation starts before an older one resolves, the older decision
/// is withheld (`None`) so no stale redirect can apply. Dropping an
/// in-flight evaluation is always safe: session mutations are atomic inside
/// [`SessionManager`], and the shared bootstrap finishes under its own lock
/// regardless of which navigation triggered it.
pub struct NavigationGuard {
    sessions: Arc<SessionManager>,
    config: GuardConfig,
    navigations: AtomicU64,
}

impl NavigationGuard {
    pub fn new(sessions: Arc<SessionManager>, config: GuardConfig) -> Self {
        Self {
            sessions,
            config,
            navigations: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Decide one navigation attempt.
    ///
    /// Returns `None` when a newer navigation superseded this one before it
    /// resolved; the host must then apply nothing for this event.
    pub async fn on_navigate(&self, target: &str) -> Option<Decision> {
        let nav = self.navigations.fetch_add(1, Ordering::SeqCst) + 1;
        let nav_id = Uuid::now_v7();

        let decision = self.decide(target, nav, false).await;
        match decision {
            Some(decision) => {
                tracing::debug!(%nav_id, target, %decision, "navigation decided");
            }
            None => {
                tracing::debug!(%nav_id, target, "navigation superseded, decision withheld");
            }
        }
        decision
    }

    fn superseded(&self, nav: u64) -> bool {
        self.navigations.load(Ordering::SeqCst) != nav
    }

    async fn decide(&self, target: &str, nav: u64, reentered: bool) -> Option<Decision> {
        // 1. Without a token only the allow-list is reachable.
        if !self.sessions.has_token() {
            if self.config.is_whitelisted(target) {
                return Some(Decision::Allow);
            }
            tracing::warn!(target, "navigation requires sign-in");
            return Some(Decision::RedirectLogin);
        }

        // 2. Already holding a token, the login page bounces home.
        if target == self.config.login_path {
            return Some(Decision::RedirectHome);
        }

        // 3. Restore the session from the persisted token if needed.
        if self.sessions.identity().is_none() {
            if let Err(err) = self.sessions.init_auth().await {
                tracing::warn!(target, error = %err, "session restore failed, sign-in required");
                if self.superseded(nav) {
                    return None;
                }
                return Some(Decision::RedirectLogin);
            }
            if self.superseded(nav) {
                return None;
            }
        }

        // 4. Load permissions and routes once, then re-evaluate the same
        // target against the now-loaded state.
        if !self.sessions.is_ready() {
            if reentered {
                // Bootstrap reported success but the session regressed
                // underneath us; fail closed rather than loop.
                self.sessions.reset_auth();
                if self.superseded(nav) {
                    return None;
                }
                return Some(Decision::RedirectLogin);
            }
            if let Err(err) = self.sessions.ensure_bootstrapped().await {
                tracing::warn!(target, error = %err, "permission bootstrap failed, sign-in required");
                if self.superseded(nav) {
                    return None;
                }
                return Some(Decision::RedirectLogin);
            }
            if self.superseded(nav) {
                return None;
            }
            return Box::pin(self.decide(target, nav, true)).await;
        }

        // 5. Evaluate the target's requirements. Unknown paths impose no
        // restriction; known paths must pass their own requirements and be
        // in the active (ancestor-gated) set.
        let decision = match self.sessions.route(target) {
            None => Decision::Allow,
            Some(route) => {
                let grants = self.sessions.snapshot();
                if route.accessible_to(&grants) && self.sessions.is_route_active(target) {
                    Decision::Allow
                } else {
                    tracing::warn!(target, "access denied");
                    Decision::RedirectForbidden
                }
            }
        };
        Some(decision)
    }

    /// Browser/window title for a target, composed from the route title.
    pub fn page_title(&self, target: &str) -> String {
        match self.sessions.route(target) {
            Some(route) if !route.title.is_empty() => {
                format!("{} - {}", route.title, self.config.app_title)
            }
            _ => self.config.app_title.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API for UI conditionals
    // ─────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> PermissionSet {
        self.sessions.snapshot()
    }

    pub fn has_permission(&self, code: &Permission) -> bool {
        self.sessions.has_permission(code)
    }

    pub fn has_any_permission(&self, codes: &[Permission]) -> bool {
        self.sessions.has_any_permission(codes)
    }

    pub fn has_all_permissions(&self, codes: &[Permission]) -> bool {
        self.sessions.has_all_permissions(codes)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.sessions.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.sessions.has_any_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.sessions.is_admin()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
