//! Pure permission filtering over route trees.
//!
//! The policy is fail-closed and parent-gates-children: a node is kept iff it
//! and every ancestor satisfy their own requirements, and a denied node takes
//! its entire subtree with it. The `admin` role bypasses everything and keeps
//! subtrees verbatim.

use mallgate_authz::{Permission, PermissionSet, Role};

use crate::route::RouteNode;

/// Whether a session's grants satisfy one set of requirements.
///
/// Both gates must pass: empty `roles` or any role held, AND empty
/// `permissions` or any permission held. Empty requirements impose no
/// restriction; `admin` bypasses both gates.
pub fn requirements_met(
    grants: &PermissionSet,
    roles: &[Role],
    permissions: &[Permission],
) -> bool {
    if grants.is_admin() {
        return true;
    }
    grants.has_any_role(roles) && grants.has_any_permission(permissions)
}

/// Whether a session's grants satisfy a single node's own requirements.
pub fn node_accessible(grants: &PermissionSet, node: &RouteNode) -> bool {
    requirements_met(grants, &node.required_roles, &node.required_permissions)
}

/// Filter one tree against a session's grants.
///
/// Returns `None` when the root itself is denied (the whole subtree is
/// dropped; descendants are never promoted). Under admin bypass the subtree
/// is returned verbatim.
pub fn filter_tree(node: &RouteNode, grants: &PermissionSet) -> Option<RouteNode> {
    if grants.is_admin() {
        return Some(node.clone());
    }
    if !node_accessible(grants, node) {
        return None;
    }

    let children = node
        .children
        .iter()
        .filter_map(|child| filter_tree(child, grants))
        .collect();

    Some(RouteNode {
        children,
        ..node.clone()
    })
}

/// Filter a forest, keeping survivors in their original order.
pub fn filter_forest(nodes: &[RouteNode], grants: &PermissionSet) -> Vec<RouteNode> {
    nodes
        .iter()
        .filter_map(|node| filter_tree(node, grants))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRef;
    use crate::route::RouteMeta;
    use mallgate_authz::{Permission, Role};

    fn node(path: &str, children: Vec<RouteNode>) -> RouteNode {
        RouteNode {
            path: path.to_string(),
            name: path.trim_start_matches('/').to_string(),
            component: ComponentRef::new("layout"),
            redirect: None,
            meta: RouteMeta::default(),
            required_roles: Vec::new(),
            required_permissions: Vec::new(),
            children,
        }
    }

    fn requiring_permissions(mut n: RouteNode, codes: &[&'static str]) -> RouteNode {
        n.required_permissions = codes.iter().map(|c| Permission::new(*c)).collect();
        n
    }

    fn requiring_roles(mut n: RouteNode, roles: &[&'static str]) -> RouteNode {
        n.required_roles = roles.iter().map(|r| Role::new(*r)).collect();
        n
    }

    fn sample_forest() -> Vec<RouteNode> {
        vec![node(
            "/root",
            vec![
                requiring_permissions(node("cat", vec![]), &["category:view"]),
                requiring_permissions(node("sys", vec![]), &["admin:view"]),
            ],
        )]
    }

    #[test]
    fn admin_gets_the_whole_forest_verbatim() {
        let forest = vec![
            requiring_permissions(node("/a", vec![node("x", vec![])]), &["system:view"]),
            node("/b", vec![]),
        ];
        let admin = PermissionSet::new([Role::admin()], []);

        let filtered = filter_forest(&forest, &admin);
        assert_eq!(filtered, forest);
    }

    #[test]
    fn matching_permission_keeps_only_that_branch() {
        let editor = PermissionSet::new(
            [Role::new("editor")],
            [Permission::new("category:view")],
        );

        let filtered = filter_forest(&sample_forest(), &editor);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].path, "cat");
    }

    #[test]
    fn denied_parent_drops_unrestricted_descendants() {
        // The child has no requirements of its own, but its parent gates it.
        let forest = vec![requiring_roles(
            node("/system", vec![node("open-child", vec![])]),
            &["system"],
        )];
        let grants = PermissionSet::new([Role::new("editor")], []);

        assert!(filter_forest(&forest, &grants).is_empty());
    }

    #[test]
    fn both_gates_must_pass() {
        let gated = requiring_permissions(
            requiring_roles(node("/both", vec![]), &["editor"]),
            &["goods:view"],
        );

        let role_only = PermissionSet::new([Role::new("editor")], []);
        assert!(filter_tree(&gated, &role_only).is_none());

        let both = PermissionSet::new([Role::new("editor")], [Permission::new("goods:view")]);
        assert!(filter_tree(&gated, &both).is_some());
    }

    #[test]
    fn filtering_preserves_sibling_order() {
        let forest = vec![
            node("/one", vec![]),
            requiring_permissions(node("/two", vec![]), &["nope:view"]),
            node("/three", vec![]),
        ];
        let grants = PermissionSet::default();

        let filtered = filter_forest(&forest, &grants);
        let paths: Vec<&str> = filtered.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["/one", "/three"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let grants = PermissionSet::new(
            [Role::new("editor")],
            [Permission::new("category:view")],
        );
        let once = filter_forest(&sample_forest(), &grants);
        let twice = filter_forest(&once, &grants);
        assert_eq!(once, twice);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn perm_pool() -> Vec<Permission> {
            ["a:view", "b:view", "c:view", "d:view"]
                .iter()
                .map(|c| Permission::new(*c))
                .collect()
        }

        fn arb_node() -> impl Strategy<Value = RouteNode> {
            let leaf = (0usize..4, 0usize..3).prop_map(|(perm, count)| {
                let pool = perm_pool();
                let mut n = node("/n", vec![]);
                n.required_permissions = pool.into_iter().skip(perm).take(count).collect();
                n
            });
            leaf.prop_recursive(4, 24, 4, |inner| {
                (proptest::collection::vec(inner, 0..4), 0usize..4, 0usize..3).prop_map(
                    |(children, perm, count)| {
                        let pool = perm_pool();
                        let mut n = node("/n", children);
                        n.required_permissions = pool.into_iter().skip(perm).take(count).collect();
                        n
                    },
                )
            })
        }

        fn arb_grants() -> impl Strategy<Value = PermissionSet> {
            (proptest::collection::hash_set(0usize..4, 0..4), any::<bool>()).prop_map(
                |(held, admin)| {
                    let pool = perm_pool();
                    let roles = if admin { vec![Role::admin()] } else { vec![] };
                    PermissionSet::new(roles, held.into_iter().map(|i| pool[i].clone()))
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: filtering twice equals filtering once.
            #[test]
            fn filter_is_idempotent(
                forest in proptest::collection::vec(arb_node(), 0..4),
                grants in arb_grants(),
            ) {
                let once = filter_forest(&forest, &grants);
                let twice = filter_forest(&once, &grants);
                prop_assert_eq!(once, twice);
            }

            /// Property: every surviving node satisfies its own predicate, and
            /// admin sessions keep the forest intact.
            #[test]
            fn survivors_satisfy_their_own_predicate(
                forest in proptest::collection::vec(arb_node(), 0..4),
                grants in arb_grants(),
            ) {
                let filtered = filter_forest(&forest, &grants);

                if grants.is_admin() {
                    prop_assert_eq!(&filtered, &forest);
                }

                fn check(nodes: &[RouteNode], grants: &PermissionSet) -> bool {
                    nodes.iter().all(|n| {
                        node_accessible(grants, n) && check(&n.children, grants)
                    })
                }
                prop_assert!(check(&filtered, &grants));
            }
        }
    }
}
