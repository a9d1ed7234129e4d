use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// How long a "remember me" token is kept by the in-memory store.
pub const PERSISTED_TOKEN_TTL_DAYS: i64 = 7;

/// Token storage collaborator.
///
/// The store is deliberately dumb: it neither interprets nor validates the
/// token. `persist` requests a multi-day lifetime instead of a
/// session-scoped one.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str, persist: bool);

    fn remove(&self);
}

#[derive(Debug, Clone)]
struct StoredToken {
    token: String,
    /// `None` for session-scoped tokens.
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory token store for tests, dev shells and hosts without durable
/// storage.
///
/// Persistent tokens expire after [`PERSISTED_TOKEN_TTL_DAYS`]; expired
/// tokens read as absent.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    slot: RwLock<Option<StoredToken>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        let slot = self.slot.read().unwrap();
        match slot.as_ref() {
            Some(stored) => match stored.expires_at {
                Some(expires_at) if expires_at <= Utc::now() => None,
                _ => Some(stored.token.clone()),
            },
            None => None,
        }
    }

    fn set(&self, token: &str, persist: bool) {
        let expires_at = persist.then(|| Utc::now() + Duration::days(PERSISTED_TOKEN_TTL_DAYS));
        *self.slot.write().unwrap() = Some(StoredToken {
            token: token.to_string(),
            expires_at,
        });
    }

    fn remove(&self) {
        *self.slot.write().unwrap() = None;
    }
}
