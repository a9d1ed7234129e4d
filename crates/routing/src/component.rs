use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque handle to a renderable view component.
///
/// The core never interprets the handle; the host UI maps it back to an
/// actual component. Comparing handles is all this layer ever does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(Cow<'static, str>);

impl ComponentRef {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Component lookup collaborator.
///
/// Descriptors name components by string identifier; the registry resolves
/// those identifiers to handles the host UI understands. Identifiers nobody
/// registered resolve to the default layout component so a single unknown
/// entry never fails a whole tree build.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentRef>,
    default_layout: ComponentRef,
}

impl ComponentRegistry {
    pub fn new(default_layout: ComponentRef) -> Self {
        Self {
            components: HashMap::new(),
            default_layout,
        }
    }

    pub fn register(&mut self, id: impl Into<String>, component: ComponentRef) {
        self.components.insert(id.into(), component);
    }

    pub fn default_layout(&self) -> &ComponentRef {
        &self.default_layout
    }

    /// Resolve a descriptor's component identifier.
    ///
    /// `None` (container/layout entries) and unknown identifiers both resolve
    /// to the default layout.
    pub fn resolve(&self, id: Option<&str>) -> ComponentRef {
        match id {
            Some(id) => match self.components.get(id) {
                Some(component) => component.clone(),
                None => {
                    tracing::debug!(component = id, "unknown component id, using default layout");
                    self.default_layout.clone()
                }
            },
            None => self.default_layout.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_default_layout() {
        let mut registry = ComponentRegistry::new(ComponentRef::new("layout"));
        registry.register("system/admin/index", ComponentRef::new("AdminView"));

        assert_eq!(
            registry.resolve(Some("system/admin/index")).as_str(),
            "AdminView"
        );
        assert_eq!(registry.resolve(Some("missing/view")).as_str(), "layout");
        assert_eq!(registry.resolve(None).as_str(), "layout");
    }
}
