//! Per-agent permission scopes.
//!
//! Every agent acts under a [`PermissionPolicy`]: a rung on the ordered
//! [`ScopeLevel`] ladder crossed with a [`DenyFamily`]. Prohibited actions
//! always win over permitted ones, and agents missing from the
//! [`PermissionRegistry`] are denied everything.

pub mod policy;
pub mod registry;
pub mod scope;

pub use policy::{PermissionDenied, PermissionPolicy};
pub use registry::PermissionRegistry;
pub use scope::{Action, DenyFamily, ScopeLevel};
