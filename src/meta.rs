//! Field-metadata interface boundary.
//!
//! Rendering layers that sit on top of the facade need per-field metadata:
//! labels, widget hints, orderings. That subsystem is not implemented here;
//! this module only declares the boundary. A plain [`Resource`](crate::Resource)
//! carries no metadata and does not implement [`DescribesFields`], so asking
//! it for field metadata is a compile error rather than a runtime fault:
//! callers that need metadata must accept a `DescribesFields` bound and be
//! handed a specialized resource type that provides it.

/// Descriptor for one renderable field of a record.
pub trait FieldMeta {
    /// The field's name as it appears in [`Record::fields`](crate::Record::fields).
    fn name(&self) -> &str;

    /// Human-readable label; defaults to the field name.
    fn label(&self) -> &str {
        self.name()
    }
}

/// Capability trait for resource specializations that carry field metadata.
pub trait DescribesFields {
    /// Look up metadata for the named fields, in the order given. Names with
    /// no metadata are skipped.
    fn field_metas(&self, names: &[&str]) -> Vec<&dyn FieldMeta>;
}
