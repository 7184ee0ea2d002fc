//! Operation context for resource calls.
//!
//! Every handler, validator, and processor receives the same
//! [`OperationContext`]: the caller's role set for permission checks, a
//! request id for logging and auditing, and an ambient key/value map for
//! request-scoped data the facade itself never interprets.

use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Request-scoped context passed opaquely through every operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Unique identifier for this request.
    pub request_id: String,
    /// Roles carried by the caller, consulted by the permission gate.
    pub roles: Vec<String>,
    extras: HashMap<String, Value>,
}

impl OperationContext {
    /// Create a context with a specific request ID and no roles.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            roles: Vec::new(),
            extras: HashMap::new(),
        }
    }

    /// Create a context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attach caller roles.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether the caller carries a role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Store a piece of ambient request-scoped data.
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extras.insert(key.into(), value.into());
    }

    /// Read a piece of ambient request-scoped data.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = OperationContext::with_generated_id();
        let b = OperationContext::with_generated_id();
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_roles() {
        let ctx = OperationContext::new("req-1").with_roles(["admin", "editor"]);
        assert!(ctx.has_role("admin"));
        assert!(ctx.has_role("editor"));
        assert!(!ctx.has_role("viewer"));
    }

    #[test]
    fn test_extras() {
        let mut ctx = OperationContext::default();
        ctx.set_extra("locale", json!("en"));
        assert_eq!(ctx.extra("locale"), Some(&json!("en")));
        assert_eq!(ctx.extra("missing"), None);
    }
}
