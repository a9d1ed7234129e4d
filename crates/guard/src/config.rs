/// Static navigation configuration: the well-known pages and the
/// unauthenticated allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Shown in composed page titles.
    pub app_title: String,
    pub login_path: String,
    pub home_path: String,
    pub forbidden_path: String,
    pub not_found_path: String,
    /// Paths reachable without a token.
    pub whitelist: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            app_title: "Mall Admin Console".to_string(),
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
            forbidden_path: "/403".to_string(),
            not_found_path: "/404".to_string(),
            whitelist: vec![
                "/login".to_string(),
                "/404".to_string(),
                "/403".to_string(),
            ],
        }
    }
}

impl GuardConfig {
    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.whitelist.iter().any(|allowed| allowed == path)
    }
}
