use serde::{Deserialize, Serialize};

/// Login request parameters.
///
/// `remember` asks the token store for a persistent (multi-day) token instead
/// of a session-scoped one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember: false,
        }
    }

    pub fn remembered(mut self) -> Self {
        self.remember = true;
        self
    }
}
