use thiserror::Error;

use crate::component::ComponentRegistry;
use crate::menu::{MenuDescriptor, MenuMeta};
use crate::route::{RouteMeta, RouteNode};

/// Maximum descriptor nesting the builder accepts.
///
/// Descriptors come from a trusted, tree-shaped source, but a cycle smuggled
/// into the payload would otherwise recurse forever. Exceeding the cap is a
/// fatal build error.
pub const MAX_MENU_DEPTH: usize = 16;

/// Route tree construction error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("menu nesting exceeds {max} levels at '{path}'")]
    DepthExceeded { path: String, max: usize },
}

/// Converts external menu descriptors into the internal route tree.
///
/// Per-node failures degrade: an unresolvable component identifier falls back
/// to the default layout, a missing title falls back to the route name. Only
/// runaway nesting aborts the build.
#[derive(Debug, Clone)]
pub struct RouteTreeBuilder {
    components: ComponentRegistry,
}

impl RouteTreeBuilder {
    pub fn new(components: ComponentRegistry) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Build a route forest from a descriptor forest, preserving order.
    pub fn build(&self, descriptors: &[MenuDescriptor]) -> Result<Vec<RouteNode>, BuildError> {
        descriptors
            .iter()
            .map(|descriptor| self.build_node(descriptor, 0))
            .collect()
    }

    fn build_node(&self, descriptor: &MenuDescriptor, depth: usize) -> Result<RouteNode, BuildError> {
        if depth >= MAX_MENU_DEPTH {
            return Err(BuildError::DepthExceeded {
                path: descriptor.path.clone(),
                max: MAX_MENU_DEPTH,
            });
        }

        let meta = descriptor.meta.clone().unwrap_or_default();
        let children = descriptor
            .children
            .iter()
            .map(|child| self.build_node(child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteNode {
            path: descriptor.path.clone(),
            name: descriptor.name.clone(),
            component: self.components.resolve(descriptor.component.as_deref()),
            redirect: descriptor.redirect.clone(),
            meta: route_meta(&descriptor.name, &meta),
            required_roles: meta.roles,
            required_permissions: meta.permissions,
            children,
        })
    }
}

fn route_meta(name: &str, meta: &MenuMeta) -> RouteMeta {
    let title = if meta.title.is_empty() {
        name.to_string()
    } else {
        meta.title.clone()
    };

    RouteMeta {
        title,
        icon: meta.icon.clone(),
        hidden: meta.hidden,
        keep_alive: meta.keep_alive,
        affix: meta.affix,
        always_show: meta.always_show,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRef;
    use mallgate_authz::{Permission, Role};

    fn builder() -> RouteTreeBuilder {
        let mut registry = ComponentRegistry::new(ComponentRef::new("layout"));
        registry.register("system/admin/index", ComponentRef::new("AdminView"));
        registry.register("product/category/index", ComponentRef::new("CategoryView"));
        RouteTreeBuilder::new(registry)
    }

    fn system_menu() -> MenuDescriptor {
        MenuDescriptor {
            id: 1,
            name: "System".to_string(),
            path: "/system".to_string(),
            component: None,
            redirect: Some("/system/admin".to_string()),
            meta: Some(MenuMeta {
                title: "System".to_string(),
                roles: vec![Role::new("admin"), Role::new("system")],
                ..Default::default()
            }),
            children: vec![MenuDescriptor {
                id: 2,
                name: "AdminManagement".to_string(),
                path: "admin".to_string(),
                component: Some("system/admin/index".to_string()),
                meta: Some(MenuMeta {
                    title: "Admins".to_string(),
                    permissions: vec![Permission::new("admin:view")],
                    ..Default::default()
                }),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn builds_nested_tree_with_requirements() {
        let routes = builder().build(&[system_menu()]).unwrap();
        assert_eq!(routes.len(), 1);

        let system = &routes[0];
        assert_eq!(system.path, "/system");
        assert_eq!(system.component.as_str(), "layout");
        assert_eq!(system.required_roles.len(), 2);
        assert_eq!(system.redirect.as_deref(), Some("/system/admin"));

        let admin = &system.children[0];
        assert_eq!(admin.component.as_str(), "AdminView");
        assert_eq!(admin.required_permissions, vec![Permission::new("admin:view")]);
        assert!(admin.children.is_empty());
    }

    #[test]
    fn unknown_component_degrades_to_default_layout() {
        let menu = MenuDescriptor {
            name: "Mystery".to_string(),
            path: "/mystery".to_string(),
            component: Some("not/registered/anywhere".to_string()),
            ..Default::default()
        };

        let routes = builder().build(&[menu]).unwrap();
        assert_eq!(routes[0].component.as_str(), "layout");
    }

    #[test]
    fn missing_title_falls_back_to_name() {
        let menu = MenuDescriptor {
            name: "Dashboard".to_string(),
            path: "/dashboard".to_string(),
            ..Default::default()
        };

        let routes = builder().build(&[menu]).unwrap();
        assert_eq!(routes[0].meta.title, "Dashboard");
        assert!(!routes[0].is_restricted());
    }

    #[test]
    fn runaway_nesting_is_fatal() {
        let mut menu = MenuDescriptor {
            name: "leaf".to_string(),
            path: "leaf".to_string(),
            ..Default::default()
        };
        for depth in 0..MAX_MENU_DEPTH + 1 {
            menu = MenuDescriptor {
                name: format!("level{depth}"),
                path: format!("level{depth}"),
                children: vec![menu],
                ..Default::default()
            };
        }

        let err = builder().build(&[menu]).unwrap_err();
        assert!(matches!(err, BuildError::DepthExceeded { .. }));
    }
}
