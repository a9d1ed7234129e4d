use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mallgate_authz::{Permission, Role};
use mallgate_core::{Credentials, UserIdentity};
use mallgate_routing::MenuDescriptor;

use crate::error::AuthError;

/// Successful login response from the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserIdentity,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Auth backend collaborator.
///
/// Implementations own transport, serialization and retry policy; this layer
/// only consumes the response shapes. Trust in the token is delegated to the
/// backend; nothing here validates it cryptographically.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginPayload, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    async fn get_user_info(&self) -> Result<UserIdentity, AuthError>;

    async fn get_user_permissions(&self) -> Result<Vec<Permission>, AuthError>;

    async fn get_user_roles(&self) -> Result<Vec<Role>, AuthError>;

    /// Exchange the current token for a fresh one.
    async fn refresh_token(&self) -> Result<String, AuthError>;
}

/// Menu/permission backend collaborator.
#[async_trait]
pub trait MenuService: Send + Sync {
    /// The menu tree the backend grants the current principal.
    async fn get_user_menu_routes(&self) -> Result<Vec<MenuDescriptor>, AuthError>;
}
