use serde::{Deserialize, Serialize};

use mallgate_authz::{Permission, Role};

/// Gating and presentation metadata attached to a menu descriptor.
///
/// This is a fixed record: every field the backend may send is declared here,
/// optional where the backend omits it. Absent roles/permissions mean the
/// entry is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub keep_alive: bool,
    #[serde(default)]
    pub affix: bool,
    #[serde(default)]
    pub always_show: bool,
}

/// External menu descriptor as delivered by the menu/permission service.
///
/// Never used as the internal representation; [`RouteTreeBuilder`] converts a
/// descriptor forest into [`RouteNode`]s.
///
/// [`RouteTreeBuilder`]: crate::builder::RouteTreeBuilder
/// [`RouteNode`]: crate::route::RouteNode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDescriptor {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    /// Component identifier, resolved through the component registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MenuMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuDescriptor>,
}
