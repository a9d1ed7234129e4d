use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use mallgate_authz::{Permission, PermissionSet, Role};

use crate::filter::requirements_met;
use crate::route::RouteNode;

/// A navigable route as seen by the guard: full path plus the data needed for
/// an access decision and page chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredRoute {
    pub path: String,
    pub name: String,
    pub title: String,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_permissions: Vec<Permission>,
}

impl RegisteredRoute {
    /// Whether the given grants satisfy this route's own requirements.
    pub fn accessible_to(&self, grants: &PermissionSet) -> bool {
        requirements_met(grants, &self.required_roles, &self.required_permissions)
    }
}

/// Flat index of the currently navigable routes, keyed by full path.
///
/// Built from an already-filtered forest. `replace` swaps the whole index, so
/// re-running bootstrap with identical session data can never accumulate
/// duplicate entries.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, RegisteredRoute>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active route set with the given forest.
    pub fn replace(&mut self, forest: &[RouteNode]) {
        self.routes.clear();
        for node in forest {
            self.insert_subtree(node, "");
        }
    }

    /// Drop every registered route.
    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn route(&self, path: &str) -> Option<&RegisteredRoute> {
        self.routes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRoute> {
        self.routes.values()
    }

    fn insert_subtree(&mut self, node: &RouteNode, parent_path: &str) {
        let full_path = join_paths(parent_path, &node.path);
        self.routes.insert(
            full_path.clone(),
            RegisteredRoute {
                path: full_path.clone(),
                name: node.name.clone(),
                title: node.meta.title.clone(),
                hidden: node.meta.hidden,
                redirect: node.redirect.clone(),
                required_roles: node.required_roles.clone(),
                required_permissions: node.required_permissions.clone(),
            },
        );
        for child in &node.children {
            self.insert_subtree(child, &full_path);
        }
    }
}

/// Join a parent path and a child segment the way the host router does:
/// absolute children stand alone, relative children append.
fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return child.to_string();
    }
    if parent.is_empty() || parent == "/" {
        return format!("/{child}");
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}
