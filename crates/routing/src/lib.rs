//! `mallgate-routing` — route/menu tree model, construction and filtering.
//!
//! The backend describes the navigable surface as a tree of menu descriptors;
//! this crate converts that external shape into the internal [`RouteNode`]
//! tree, filters trees against a session's capabilities, and maintains the
//! flat registry of currently navigable routes.
//!
//! Filtering is pure: it produces new trees and never mutates the source, so
//! the full tree and any filtered view never alias.

pub mod builder;
pub mod component;
pub mod filter;
pub mod menu;
pub mod registry;
pub mod route;

pub use builder::{BuildError, RouteTreeBuilder, MAX_MENU_DEPTH};
pub use component::{ComponentRef, ComponentRegistry};
pub use filter::{filter_forest, filter_tree, node_accessible, requirements_met};
pub use menu::{MenuDescriptor, MenuMeta};
pub use registry::{RegisteredRoute, RouteRegistry};
pub use route::{RouteMeta, RouteNode};
