use serde::{Deserialize, Serialize};

use mallgate_authz::{Permission, Role};

use crate::component::ComponentRef;

/// Presentation metadata carried by a route node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub keep_alive: bool,
    #[serde(default)]
    pub affix: bool,
    #[serde(default)]
    pub always_show: bool,
}

/// A node of the internal route/menu tree.
///
/// Immutable once constructed: filtering produces new trees rather than
/// mutating in place. Empty `required_roles`/`required_permissions` mean the
/// node itself imposes no restriction (ancestors may still gate it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub path: String,
    pub name: String,
    pub component: ComponentRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Whether this node carries any role/permission requirement of its own.
    pub fn is_restricted(&self) -> bool {
        !self.required_roles.is_empty() || !self.required_permissions.is_empty()
    }

    /// Count of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(RouteNode::subtree_len).sum::<usize>()
    }
}
