//! Generic CRUD resource facade for Rust.
//!
//! Provides a uniform find/create/update/delete contract over arbitrary
//! record types, with swappable persistence handlers, ordered
//! validator/processor pipelines with transactional rollback, and role-based
//! permission checks.
//!
//! # Core Components
//!
//! - [`Resource`] - Descriptor and entry point for one addressable record type
//! - [`Record`] - Capability trait implemented per record type
//! - [`Datastore`] - Trait for implementing storage backends
//! - [`AccessPolicy`] - Trait for permission-rule engines
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use crudbase::{MemoryDatastore, Record, Resource};
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
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resource = Resource::<Article, _>::new(MemoryDatastore::new())?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod datastore;
pub mod error;
pub mod meta;
pub mod permission;
pub mod record;
pub mod resource;
pub mod values;

// Re-export commonly used types for convenience
pub use context::OperationContext;
pub use datastore::{Datastore, MemoryDatastore, StoreError, StoreTransaction};
pub use error::{ResourceError, ResourceResult};
pub use meta::{DescribesFields, FieldMeta};
pub use permission::{ANYONE, AccessPolicy, PermissionMode, RolePolicy};
pub use record::Record;
pub use resource::{
    DeleteHandler, Descriptor, FindManyHandler, FindOneHandler, Resource, SaveHandler, StoreBacked,
};
pub use values::FieldValues;
