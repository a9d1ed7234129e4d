//! `mallgate-guard` — one access decision per navigation event.
//!
//! The guard sits between the host navigation framework and the session
//! layer: every navigation attempt goes through [`NavigationGuard::on_navigate`],
//! which consults the session, triggers the (single-flight) permission
//! bootstrap when needed and answers with a [`Decision`]. Decisions from
//! navigations that were superseded by a newer one are withheld so a stale
//! redirect can never apply.

pub mod config;
pub mod decision;
pub mod guard;

pub use config::GuardConfig;
pub use decision::Decision;
pub use guard::NavigationGuard;
