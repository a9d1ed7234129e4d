use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UserId;

/// Account status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountStatus {
    /// Account may authenticate and transact.
    #[default]
    Active,
    /// Account is disabled and cannot authenticate.
    Disabled,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid account status code: {0}")]
pub struct InvalidAccountStatus(pub u8);

impl TryFrom<u8> for AccountStatus {
    type Error = InvalidAccountStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountStatus::Disabled),
            1 => Ok(AccountStatus::Active),
            other => Err(InvalidAccountStatus(other)),
        }
    }
}

impl From<AccountStatus> for u8 {
    fn from(value: AccountStatus) -> Self {
        match value {
            AccountStatus::Disabled => 0,
            AccountStatus::Active => 1,
        }
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Identity of the authenticated principal, as returned by the auth backend.
///
/// Wire field names follow the backend contract (camelCase, with the legacy
/// `createTime`/`updateTime` timestamp names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub status: AccountStatus,
    #[serde(rename = "createTime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updateTime")]
    pub updated_at: DateTime<Utc>,
}

impl UserIdentity {
    /// Name to show in the UI chrome: nickname when present, username otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }
}
