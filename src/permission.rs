//! Operation modes and role-based access policies.
//!
//! A resource optionally carries an [`AccessPolicy`]; when it does, every
//! facade operation asks the policy for a verdict before proceeding. The
//! policy sees only the requested [`PermissionMode`] and the caller's roles;
//! it never learns anything about the record being touched.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// The operation being permission-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionMode {
    Create,
    Read,
    Update,
    Delete,
}

impl PermissionMode {
    pub const ALL: [PermissionMode; 4] = [
        PermissionMode::Create,
        PermissionMode::Read,
        PermissionMode::Update,
        PermissionMode::Delete,
    ];
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionMode::Create => "create",
            PermissionMode::Read => "read",
            PermissionMode::Update => "update",
            PermissionMode::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Permission-rule collaborator: answers allow/deny for a mode and role set.
///
/// Implementations must be pure queries: a verdict must not depend on or
/// mutate any per-request state.
pub trait AccessPolicy: Send + Sync {
    fn has_permission(&self, mode: PermissionMode, roles: &[String]) -> bool;
}

/// Role that matches any caller, including one with no roles at all.
pub const ANYONE: &str = "*";

/// A role table: for each mode, the set of roles allowed to perform it.
///
/// Modes with no registered roles are denied. Register [`ANYONE`] to open a
/// mode to every caller.
///
/// ```rust
/// use crudbase::{AccessPolicy, PermissionMode, RolePolicy, ANYONE};
///
/// let policy = RolePolicy::new()
///     .allow(PermissionMode::Read, [ANYONE])
///     .allow(PermissionMode::Update, ["editor", "admin"])
///     .allow(PermissionMode::Delete, ["admin"]);
///
/// assert!(policy.has_permission(PermissionMode::Read, &[]));
/// assert!(!policy.has_permission(PermissionMode::Delete, &["editor".into()]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    allowed: HashMap<PermissionMode, HashSet<String>>,
}

impl RolePolicy {
    /// Create a policy that denies everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the given roles to perform `mode`. Cumulative across calls.
    pub fn allow<I, S>(mut self, mode: PermissionMode, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .entry(mode)
            .or_default()
            .extend(roles.into_iter().map(Into::into));
        self
    }

    /// Allow the given roles to perform every mode.
    pub fn allow_all<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        for mode in PermissionMode::ALL {
            self.allowed
                .entry(mode)
                .or_default()
                .extend(roles.iter().cloned());
        }
        self
    }
}

impl AccessPolicy for RolePolicy {
    fn has_permission(&self, mode: PermissionMode, roles: &[String]) -> bool {
        match self.allowed.get(&mode) {
            Some(allowed) => {
                allowed.contains(ANYONE) || roles.iter().any(|r| allowed.contains(r))
            }
            None => false,
        }
    }
}
