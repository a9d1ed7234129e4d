use serde::{Deserialize, Serialize};

/// Outcome of one navigation attempt.
///
/// The host applies the decision: render the target, or navigate to the
/// login/forbidden/home page instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    RedirectLogin,
    RedirectForbidden,
    RedirectHome,
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::RedirectLogin => write!(f, "redirect_login"),
            Decision::RedirectForbidden => write!(f, "redirect_forbidden"),
            Decision::RedirectHome => write!(f, "redirect_home"),
        }
    }
}
