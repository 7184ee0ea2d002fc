//! Persistence abstraction for resource records.
//!
//! The [`Datastore`] trait is the facade's only view of storage: fetch by
//! primary-field predicate, upsert, remove, and a transactional scope. It is
//! deliberately free of facade semantics: no validation, no permissions, no
//! knowledge of record types beyond a `kind` string and JSON rows. The
//! distinction between create and update does not exist down here; both are a
//! [`put`](Datastore::put).
//!
//! The shipped [`MemoryDatastore`] backend is suitable for development and
//! testing; production deployments implement this trait over their own
//! storage.

pub mod errors;
pub mod memory;

pub use errors::StoreError;
pub use memory::{MemoryDatastore, MemoryStats};

use async_trait::async_trait;
use serde_json::Value;

/// An equality predicate over serialized record fields.
///
/// The facade builds predicates from a resource's primary fields, in primary
/// field order; a row matches when every named field equals the paired value.
pub type Predicate = [(String, Value)];

/// Render a predicate for log and error messages, e.g. `id=3/region="eu"`.
pub(crate) fn describe_predicate(predicate: &Predicate) -> String {
    let parts: Vec<String> = predicate
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    parts.join("/")
}

/// Core trait for datastore backends.
///
/// All operations are scoped to a `kind` (the record type's name) and
/// exchange rows as JSON values. Implementations must be safe for concurrent
/// use; no call may assume exclusive access.
#[async_trait]
pub trait Datastore: Send + Sync + 'static {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The transactional scope handed to one in-flight operation.
    type Tx: StoreTransaction<Error = Self::Error>;

    /// Open a transactional scope covering subsequent writes to `kind`.
    ///
    /// The scope must make a later [`rollback`](StoreTransaction::rollback)
    /// undo every write to `kind` performed after this call by the holding
    /// operation.
    async fn begin(&self, kind: &str) -> Result<Self::Tx, Self::Error>;

    /// Fetch every row of `kind`, in a stable order.
    async fn fetch_all(&self, kind: &str) -> Result<Vec<Value>, Self::Error>;

    /// Fetch the first row of `kind` matching `predicate`, or `None`.
    async fn fetch_one(
        &self,
        kind: &str,
        predicate: &Predicate,
    ) -> Result<Option<Value>, Self::Error>;

    /// Store `data` as the row of `kind` identified by `predicate`,
    /// replacing any existing row. Returns the stored row.
    async fn put(
        &self,
        kind: &str,
        predicate: &Predicate,
        data: Value,
    ) -> Result<Value, Self::Error>;

    /// Remove the rows of `kind` matching `predicate`. Returns `true` when
    /// at least one row was removed.
    async fn remove(&self, kind: &str, predicate: &Predicate) -> Result<bool, Self::Error>;
}

/// Transactional scope for one in-flight mutating operation.
///
/// Dropping a scope without calling either method leaves the backend's
/// writes in place (commit-on-drop would hide failures; the facade always
/// resolves the scope explicitly).
#[async_trait]
pub trait StoreTransaction: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Make the writes performed under this scope durable.
    async fn commit(self) -> Result<(), Self::Error>;

    /// Undo the writes performed under this scope.
    async fn rollback(self) -> Result<(), Self::Error>;
}
