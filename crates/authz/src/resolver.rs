use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// The capability view of a session: the roles and permission codes a
/// principal currently holds.
///
/// All queries are pure and total. A set carrying the `admin` role satisfies
/// every check (universal bypass).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    roles: HashSet<Role>,
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new(
        roles: impl IntoIterator<Item = Role>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    pub fn has_permissions(&self) -> bool {
        !self.permissions.is_empty()
    }

    /// Whether the principal carries the universal-bypass role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    /// True iff the code is held, or the principal is an admin.
    pub fn has_permission(&self, code: &Permission) -> bool {
        self.is_admin() || self.permissions.contains(code)
    }

    /// True iff any of `codes` is held, or the principal is an admin.
    ///
    /// An empty list imposes no restriction and is vacuously true.
    pub fn has_any_permission<'a>(
        &self,
        codes: impl IntoIterator<Item = &'a Permission>,
    ) -> bool {
        if self.is_admin() {
            return true;
        }
        let mut codes = codes.into_iter().peekable();
        if codes.peek().is_none() {
            return true;
        }
        codes.any(|code| self.permissions.contains(code))
    }

    /// True iff every code is held, or the principal is an admin.
    pub fn has_all_permissions<'a>(
        &self,
        codes: impl IntoIterator<Item = &'a Permission>,
    ) -> bool {
        self.is_admin() || codes.into_iter().all(|code| self.permissions.contains(code))
    }

    /// True iff the role is held, or the principal is an admin.
    pub fn has_role(&self, role: &Role) -> bool {
        self.is_admin() || self.roles.contains(role)
    }

    /// True iff any of `roles` is held, or the principal is an admin.
    ///
    /// An empty list imposes no restriction and is vacuously true.
    pub fn has_any_role<'a>(&self, roles: impl IntoIterator<Item = &'a Role>) -> bool {
        if self.is_admin() {
            return true;
        }
        let mut roles = roles.into_iter().peekable();
        if roles.peek().is_none() {
            return true;
        }
        roles.any(|role| self.roles.contains(role))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> PermissionSet {
        PermissionSet::new(
            [Role::new("editor")],
            [Permission::new("category:view"), Permission::new("goods:view")],
        )
    }

    fn admin() -> PermissionSet {
        PermissionSet::new([Role::admin()], [])
    }

    #[test]
    fn has_permission_checks_membership() {
        let set = editor();
        assert!(set.has_permission(&Permission::new("category:view")));
        assert!(!set.has_permission(&Permission::new("admin:view")));
    }

    #[test]
    fn admin_bypasses_every_permission_check() {
        let set = admin();
        assert!(set.has_permission(&Permission::new("anything:at:all")));
        assert!(set.has_any_permission(&[Permission::new("nope")]));
        assert!(set.has_all_permissions(&[
            Permission::new("a:view"),
            Permission::new("b:view"),
        ]));
        assert!(set.has_role(&Role::new("editor")));
        assert!(set.has_any_role(&[Role::new("warehouse")]));
    }

    #[test]
    fn empty_code_list_is_vacuously_true() {
        let set = editor();
        assert!(set.has_any_permission(&[]));
        assert!(set.has_any_role(&[]));
        assert!(set.has_all_permissions(&[]));

        // Even for a session with nothing at all.
        let nobody = PermissionSet::default();
        assert!(nobody.has_any_permission(&[]));
        assert!(nobody.has_any_role(&[]));
    }

    #[test]
    fn has_any_permission_is_intersection_non_emptiness() {
        let set = editor();
        assert!(set.has_any_permission(&[
            Permission::new("admin:view"),
            Permission::new("goods:view"),
        ]));
        assert!(!set.has_any_permission(&[
            Permission::new("admin:view"),
            Permission::new("role:view"),
        ]));
    }

    #[test]
    fn has_all_permissions_requires_every_code() {
        let set = editor();
        assert!(set.has_all_permissions(&[
            Permission::new("category:view"),
            Permission::new("goods:view"),
        ]));
        assert!(!set.has_all_permissions(&[
            Permission::new("category:view"),
            Permission::new("admin:view"),
        ]));
    }

    #[test]
    fn role_queries_without_admin() {
        let set = editor();
        assert!(set.has_role(&Role::new("editor")));
        assert!(!set.has_role(&Role::new("warehouse")));
        assert!(set.has_any_role(&[Role::new("warehouse"), Role::new("editor")]));
        assert!(!set.is_admin());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn perm_code() -> impl Strategy<Value = String> {
            "[a-z]{1,8}:[a-z]{1,8}"
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: hasAnyPermission is true iff the code list is empty,
            /// the intersection is non-empty, or the set is admin.
            #[test]
            fn has_any_permission_matches_set_semantics(
                held in proptest::collection::hash_set(perm_code(), 0..8),
                asked in proptest::collection::vec(perm_code(), 0..8),
                is_admin in any::<bool>(),
            ) {
                let roles = if is_admin { vec![Role::admin()] } else { vec![] };
                let set = PermissionSet::new(
                    roles,
                    held.iter().cloned().map(Permission::from),
                );
                let asked: Vec<Permission> = asked.into_iter().map(Permission::from).collect();

                let expected = is_admin
                    || asked.is_empty()
                    || asked.iter().any(|p| held.contains(p.as_str()));
                prop_assert_eq!(set.has_any_permission(&asked), expected);
            }

            /// Property: has_all implies has_any for non-empty lists.
            #[test]
            fn has_all_implies_has_any(
                held in proptest::collection::hash_set(perm_code(), 0..8),
                asked in proptest::collection::vec(perm_code(), 1..8),
            ) {
                let set = PermissionSet::new(
                    [],
                    held.iter().cloned().map(Permission::from),
                );
                let asked: Vec<Permission> = asked.into_iter().map(Permission::from).collect();

                if set.has_all_permissions(&asked) {
                    prop_assert!(set.has_any_permission(&asked));
                }
            }
        }
    }
}
