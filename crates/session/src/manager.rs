use std::sync::{Arc, RwLock};

use mallgate_authz::{Permission, PermissionSet, Role};
use mallgate_core::{Credentials, UserIdentity};
use mallgate_routing::{
    filter_forest, ComponentRegistry, RegisteredRoute, RouteNode, RouteRegistry, RouteTreeBuilder,
};

use crate::error::{AuthError, BootstrapError};
use crate::services::{AuthService, MenuService};
use crate::session::{Session, SessionPhase};
use crate::token::TokenStore;

/// Owner of the session lifecycle and the permission bootstrap.
///
/// Created once by the application root and shared by `Arc`. Locks are held
/// only for short, await-free critical sections; the single network-bound
/// critical section (bootstrap) is serialized by its own async mutex so
/// concurrent callers collapse into one round-trip and one registration.
pub struct SessionManager {
    auth: Arc<dyn AuthService>,
    menus: Arc<dyn MenuService>,
    tokens: Arc<dyn TokenStore>,
    builder: RouteTreeBuilder,
    state: RwLock<Session>,
    /// Every route the backend knows about, with its requirements.
    route_table: RwLock<RouteRegistry>,
    /// The routes the current session may actually navigate to.
    active_routes: RwLock<RouteRegistry>,
    menu_tree: RwLock<Vec<RouteNode>>,
    bootstrap: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// Build a manager around its collaborators.
    ///
    /// A token already in the store is adopted into the session (it is not
    /// trusted until `init_auth` validates it against the backend).
    pub fn new(
        auth: Arc<dyn AuthService>,
        menus: Arc<dyn MenuService>,
        tokens: Arc<dyn TokenStore>,
        components: ComponentRegistry,
    ) -> Self {
        let persisted = tokens.get();
        Self {
            auth,
            menus,
            tokens,
            builder: RouteTreeBuilder::new(components),
            state: RwLock::new(Session::with_token(persisted)),
            route_table: RwLock::new(RouteRegistry::new()),
            active_routes: RwLock::new(RouteRegistry::new()),
            menu_tree: RwLock::new(Vec::new()),
            bootstrap: tokio::sync::Mutex::new(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate against the backend and populate the session.
    ///
    /// On success the token is stored (`remember` requests persistence) and
    /// the phase lands on `Authenticated`. On failure the phase is back on
    /// `Anonymous` and the stored token is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        {
            let mut state = self.state.write().unwrap();
            state.reset();
            state.advance_to(SessionPhase::Authenticating)?;
        }

        let payload = match self.auth.login(credentials).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(username = %credentials.username, error = %err, "login failed");
                self.state.write().unwrap().reset();
                return Err(err);
            }
        };

        self.tokens.set(&payload.token, credentials.remember);

        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.token = Some(payload.token);
            state.user = Some(payload.user);
            state.grants = PermissionSet::new(payload.roles, payload.permissions);
            state.remembered = credentials.remember;
            if let Err(err) = state.advance_to(SessionPhase::Authenticated) {
                drop(state);
                self.reset_auth();
                return Err(err.into());
            }
            state.clone()
        };

        tracing::info!(username = %credentials.username, "login succeeded");
        Ok(snapshot)
    }

    /// End the session.
    ///
    /// Remote invalidation is best-effort: a failure is logged and swallowed.
    /// Local cleanup always completes.
    pub async fn logout(&self) {
        if let Err(err) = self.auth.logout().await {
            tracing::warn!(error = %err, "remote logout failed; clearing local session anyway");
        }
        self.reset_auth();
        tracing::info!("logged out");
    }

    /// Restore a session from a persisted token.
    ///
    /// Fetches the identity to validate the token, then roles and permissions
    /// concurrently; both must land before the phase advances to
    /// `Authenticated`. Any failure wipes the session and the stored token.
    pub async fn init_auth(&self) -> Result<(), AuthError> {
        let Some(token) = self.tokens.get() else {
            self.reset_auth();
            return Err(AuthError::MissingToken);
        };

        {
            let mut state = self.state.write().unwrap();
            if state.user.is_some() {
                return Ok(());
            }
            if state.phase() != SessionPhase::Anonymous {
                state.reset();
            }
            state.token = Some(token);
            state.advance_to(SessionPhase::Authenticating)?;
        }

        let user = match self.auth.get_user_info().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "identity fetch failed; resetting session");
                self.reset_auth();
                return Err(err);
            }
        };

        let (roles, permissions) =
            match tokio::join!(self.auth.get_user_roles(), self.auth.get_user_permissions()) {
                (Ok(roles), Ok(permissions)) => (roles, permissions),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(error = %err, "grant fetch failed; resetting session");
                    self.reset_auth();
                    return Err(err);
                }
            };

        let mut state = self.state.write().unwrap();
        state.user = Some(user);
        state.grants = PermissionSet::new(roles, permissions);
        if let Err(err) = state.advance_to(SessionPhase::Authenticated) {
            drop(state);
            self.reset_auth();
            return Err(err.into());
        }
        tracing::info!("session restored from persisted token");
        Ok(())
    }

    /// Unconditional wipe: session, routes, menus and stored token.
    ///
    /// Usable from any phase; always lands on `Anonymous`.
    pub fn reset_auth(&self) {
        self.tokens.remove();
        self.state.write().unwrap().reset();
        self.route_table.write().unwrap().clear();
        self.active_routes.write().unwrap().clear();
        self.menu_tree.write().unwrap().clear();
    }

    /// Exchange the current token for a fresh one, preserving the
    /// persistence choice made at login. No phase change.
    pub async fn refresh_token(&self) -> Result<(), AuthError> {
        let token = self.auth.refresh_token().await?;
        let remembered = {
            let mut state = self.state.write().unwrap();
            state.token = Some(token.clone());
            state.remembered
        };
        self.tokens.set(&token, remembered);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission bootstrap (single-flight)
    // ─────────────────────────────────────────────────────────────────────────

    /// Load permission data and register the accessible route tree, exactly
    /// once per session.
    ///
    /// Concurrent callers share one execution: whoever loses the race on the
    /// bootstrap mutex re-checks the phase and returns without refetching.
    /// Fail-closed: on any error the session is reset before returning, so a
    /// failed bootstrap can never leave partially granted access.
    pub async fn ensure_bootstrapped(&self) -> Result<(), BootstrapError> {
        if self.phase() == SessionPhase::Ready {
            return Ok(());
        }

        let _flight = self.bootstrap.lock().await;
        if self.phase() == SessionPhase::Ready {
            return Ok(());
        }

        if let Err(err) = self.advance_phase(SessionPhase::PermissionsLoading) {
            self.reset_auth();
            return Err(err.into());
        }

        // Grants delivered at login are reused; refetch only when incomplete.
        let incomplete = {
            let state = self.state.read().unwrap();
            !state.grants.has_roles() || !state.grants.has_permissions()
        };
        if incomplete {
            let (roles, permissions) =
                match tokio::join!(self.auth.get_user_roles(), self.auth.get_user_permissions()) {
                    (Ok(roles), Ok(permissions)) => (roles, permissions),
                    (Err(err), _) | (_, Err(err)) => {
                        tracing::warn!(error = %err, "grant fetch failed during bootstrap");
                        self.reset_auth();
                        return Err(BootstrapError::Fetch(err));
                    }
                };
            self.state.write().unwrap().grants = PermissionSet::new(roles, permissions);
        }

        let descriptors = match self.menus.get_user_menu_routes().await {
            Ok(descriptors) => descriptors,
            Err(err) => {
                tracing::warn!(error = %err, "menu fetch failed during bootstrap");
                self.reset_auth();
                return Err(BootstrapError::Fetch(err));
            }
        };

        let forest = match self.builder.build(&descriptors) {
            Ok(forest) => forest,
            Err(err) => {
                tracing::error!(error = %err, "menu tree build failed");
                self.reset_auth();
                return Err(BootstrapError::Build(err));
            }
        };

        let grants = self.snapshot();
        let accessible = filter_forest(&forest, &grants);

        self.route_table.write().unwrap().replace(&forest);
        self.active_routes.write().unwrap().replace(&accessible);
        *self.menu_tree.write().unwrap() = accessible;

        if let Err(err) = self.advance_phase(SessionPhase::Ready) {
            self.reset_auth();
            return Err(err.into());
        }

        tracing::info!(
            active_routes = self.active_routes.read().unwrap().len(),
            "permission bootstrap complete"
        );
        Ok(())
    }

    fn advance_phase(&self, next: SessionPhase) -> Result<(), crate::session::PhaseError> {
        self.state.write().unwrap().advance_to(next)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.state.read().unwrap().phase()
    }

    /// Whether the permission bootstrap has completed for this session.
    pub fn is_ready(&self) -> bool {
        self.phase() == SessionPhase::Ready
    }

    /// Whether a token exists in the store (says nothing about validity).
    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.state.read().unwrap().user().cloned()
    }

    /// Capability snapshot of the current session.
    pub fn snapshot(&self) -> PermissionSet {
        self.state.read().unwrap().grants().clone()
    }

    pub fn has_permission(&self, code: &Permission) -> bool {
        self.state.read().unwrap().grants().has_permission(code)
    }

    pub fn has_any_permission(&self, codes: &[Permission]) -> bool {
        self.state.read().unwrap().grants().has_any_permission(codes)
    }

    pub fn has_all_permissions(&self, codes: &[Permission]) -> bool {
        self.state.read().unwrap().grants().has_all_permissions(codes)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.state.read().unwrap().grants().has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.state.read().unwrap().grants().has_any_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().unwrap().grants().is_admin()
    }

    /// Look up a known route (accessible or not) by full path.
    pub fn route(&self, path: &str) -> Option<RegisteredRoute> {
        self.route_table.read().unwrap().route(path).cloned()
    }

    /// Whether the current session may navigate to the path.
    ///
    /// Active routes are exactly the filtered tree, so a denied ancestor
    /// makes every descendant inactive as well.
    pub fn is_route_active(&self, path: &str) -> bool {
        self.active_routes.read().unwrap().contains(path)
    }

    pub fn accessible_routes(&self) -> Vec<RegisteredRoute> {
        self.active_routes.read().unwrap().iter().cloned().collect()
    }

    /// The accessible menu forest with hidden entries pruned, for sidebars.
    pub fn visible_menus(&self) -> Vec<RouteNode> {
        prune_hidden(&self.menu_tree.read().unwrap())
    }
}

fn prune_hidden(nodes: &[RouteNode]) -> Vec<RouteNode> {
    nodes
        .iter()
        .filter(|node| !node.meta.hidden)
        .map(|node| RouteNode {
            children: prune_hidden(&node.children),
            ..node.clone()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
