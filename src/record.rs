//! The record capability trait.
//!
//! A `Resource` never inspects its record type at runtime. Everything the
//! facade needs (the type's name, its field set, the designated primary
//! field, and fresh instances) is supplied by the [`Record`] trait, bound at
//! resource construction. Implementing it is a few lines per type:
//!
//! ```rust
//! use crudbase::Record;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Article {
//!     id: String,
//!     title: String,
//! }
//!
//! impl Record for Article {
//!     fn fields() -> &'static [&'static str] {
//!         &["id", "title"]
//!     }
//! }
//!
//! assert_eq!(Article::record_name(), "Article");
//! assert_eq!(Article::primary_field(), Some("id"));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Capability trait for types managed by a [`Resource`](crate::Resource).
///
/// The serde bounds exist because the default handlers and the shipped
/// in-memory datastore exchange records as JSON rows; a custom handler pair
/// over a typed store never has to serialize anything.
pub trait Record:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The record type's bare name, e.g. `"Article"`.
    ///
    /// The default takes the last path segment of the Rust type name, which
    /// is right for any non-generic type. Override for generic or renamed
    /// records.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Record")
    }

    /// All addressable field names of the record, in declaration order.
    ///
    /// These must match the serde field names, since predicates built from
    /// them are applied to the serialized form.
    fn fields() -> &'static [&'static str];

    /// The designated primary field, if the type has one.
    ///
    /// Defaults to a field named `id` when present. Types keyed differently
    /// override this; types with no usable key return `None` and can only be
    /// configured with explicit primary fields.
    fn primary_field() -> Option<&'static str> {
        Self::fields().iter().copied().find(|f| *f == "id")
    }
}

/// Render a camel-case type name as a human-readable resource name.
///
/// `"Article"` stays `"Article"`; `"OrderItem"` becomes `"Order Item"`;
/// leading acronyms are kept together (`"HTTPRoute"` → `"HTTP Route"`).
pub(crate) fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || (chars[i - 1].is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct OrderItem {
        id: String,
        quantity: u32,
    }

    impl Record for OrderItem {
        fn fields() -> &'static [&'static str] {
            &["id", "quantity"]
        }
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct AuditEntry {
        sequence: u64,
        message: String,
    }

    impl Record for AuditEntry {
        fn fields() -> &'static [&'static str] {
            &["sequence", "message"]
        }

        fn primary_field() -> Option<&'static str> {
            Some("sequence")
        }
    }

    #[test]
    fn test_record_name_strips_module_path() {
        assert_eq!(OrderItem::record_name(), "OrderItem");
    }

    #[test]
    fn test_default_primary_field_is_id() {
        assert_eq!(OrderItem::primary_field(), Some("id"));
    }

    #[test]
    fn test_overridden_primary_field() {
        assert_eq!(AuditEntry::primary_field(), Some("sequence"));
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("Article"), "Article");
        assert_eq!(humanize("OrderItem"), "Order Item");
        assert_eq!(humanize("HTTPRoute"), "HTTP Route");
        assert_eq!(humanize(""), "");
    }
}
