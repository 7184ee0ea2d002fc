//! The resource facade.
//!
//! A [`Resource`] is the descriptor and entry point for one addressable kind
//! of record: it knows the record's display name and primary fields, owns the
//! four handler slots, the validator/processor chains, and the optional
//! access policy. Construction and configuration happen through `&mut self`
//! during startup; the four `call_*` operations take `&self` and are safe to
//! invoke concurrently once the resource is shared.
//!
//! ```rust
//! use crudbase::{FieldValues, MemoryDatastore, OperationContext, Record, Resource};
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
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut resource = Resource::<Article, _>::new(MemoryDatastore::new())?;
//! resource.add_validator(|article: &Article, _values, _ctx| {
//!     if article.title.is_empty() {
//!         Err("title must not be empty".into())
//!     } else {
//!         Ok(())
//!     }
//! });
//!
//! let mut article = resource.new_record();
//! article.title = "hello".into();
//! let ctx = OperationContext::default();
//! resource.call_save(&mut article, &FieldValues::new(), &ctx).await?;
//! # Ok(())
//! # }
//! ```

pub mod handlers;
mod operations;

pub use handlers::{DeleteHandler, FindManyHandler, FindOneHandler, SaveHandler, StoreBacked};

use crate::context::OperationContext;
use crate::datastore::Datastore;
use crate::error::{ResourceError, ResourceResult};
use crate::permission::{AccessPolicy, PermissionMode};
use crate::record::{Record, humanize};
use crate::values::FieldValues;
use std::sync::Arc;

/// Validator callback: inspects a candidate change and reports acceptability.
///
/// Validators receive the record immutably; transforming a candidate is a
/// processor's job.
pub type ValidatorFn<R> =
    dyn Fn(&R, &FieldValues, &OperationContext) -> Result<(), String> + Send + Sync;

/// Processor callback: may transform the candidate before persistence
/// (defaulting, normalization).
pub type ProcessorFn<R> =
    dyn Fn(&mut R, &FieldValues, &OperationContext) -> Result<(), String> + Send + Sync;

/// The descriptor view of a resource: display name and primary-field set.
///
/// Handlers receive this with every call so custom implementations can build
/// lookup predicates the same way the defaults do.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    primary_fields: Vec<&'static str>,
}

impl Descriptor {
    /// Human-readable resource name derived from the record type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered primary-field set uniquely identifying a record instance.
    pub fn primary_fields(&self) -> &[&'static str] {
        &self.primary_fields
    }
}

/// Facade for one addressable record type `R` persisted through datastore `D`.
pub struct Resource<R: Record, D: Datastore> {
    descriptor: Descriptor,
    store: D,
    find_many: Arc<dyn FindManyHandler<R>>,
    find_one: Arc<dyn FindOneHandler<R>>,
    save: Arc<dyn SaveHandler<R>>,
    delete: Arc<dyn DeleteHandler<R>>,
    permission: Option<Arc<dyn AccessPolicy>>,
    validators: Vec<Box<ValidatorFn<R>>>,
    processors: Vec<Box<ProcessorFn<R>>>,
}

impl<R: Record, D: Datastore + Clone> Resource<R, D> {
    /// Create a resource with default datastore-backed handlers and the
    /// record type's designated primary field.
    ///
    /// Fails with a configuration error when the record type designates no
    /// primary field; such types need [`with_primary_fields`](Self::with_primary_fields).
    pub fn new(store: D) -> ResourceResult<Self> {
        let name = humanize(R::record_name());
        let primary = R::primary_field().ok_or_else(|| {
            ResourceError::configuration(format!("no valid primary field for resource {name}"))
        })?;
        Ok(Self::assemble(store, name, vec![primary]))
    }

    /// Create a resource keyed by an explicit set of primary fields.
    ///
    /// Every name must resolve against [`Record::fields`]; the first
    /// unresolved name fails the whole construction.
    pub fn with_primary_fields(store: D, names: &[&str]) -> ResourceResult<Self> {
        let name = humanize(R::record_name());
        let primary = resolve_fields::<R>(&name, names)?;
        Ok(Self::assemble(store, name, primary))
    }

    fn assemble(store: D, name: String, primary_fields: Vec<&'static str>) -> Self {
        let backed = Arc::new(StoreBacked::new(store.clone()));
        Self {
            descriptor: Descriptor {
                name,
                primary_fields,
            },
            store,
            find_many: backed.clone(),
            find_one: backed.clone(),
            save: backed.clone(),
            delete: backed,
            permission: None,
            validators: Vec::new(),
            processors: Vec::new(),
        }
    }
}

impl<R: Record, D: Datastore> Resource<R, D> {
    /// The resource-descriptor view: display name plus primary fields.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Human-readable resource name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The ordered primary-field set.
    pub fn primary_fields(&self) -> &[&'static str] {
        &self.descriptor.primary_fields
    }

    pub(crate) fn store(&self) -> &D {
        &self.store
    }

    /// Replace the primary-field set.
    ///
    /// With explicit names, every name is resolved before anything changes,
    /// so a failure leaves the previous set intact. With an empty slice, the
    /// record type's designated primary field is re-resolved.
    pub fn set_primary_fields(&mut self, names: &[&str]) -> ResourceResult<()> {
        let resolved = if names.is_empty() {
            let primary = R::primary_field().ok_or_else(|| {
                ResourceError::configuration(format!(
                    "no valid primary field for resource {}",
                    self.descriptor.name
                ))
            })?;
            vec![primary]
        } else {
            resolve_fields::<R>(&self.descriptor.name, names)?
        };
        self.descriptor.primary_fields = resolved;
        Ok(())
    }

    /// Append a validator. Validators run in registration order on every
    /// save and delete, after the processors.
    pub fn add_validator<F>(&mut self, validator: F)
    where
        F: Fn(&R, &FieldValues, &OperationContext) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
    }

    /// Append a processor. Processors run in registration order on every
    /// save and delete, before the validators.
    pub fn add_processor<F>(&mut self, processor: F)
    where
        F: Fn(&mut R, &FieldValues, &OperationContext) -> Result<(), String>
            + Send
            + Sync
            + 'static,
    {
        self.processors.push(Box::new(processor));
    }

    /// Gate operations on an access policy. Without one, every operation is
    /// allowed.
    pub fn set_permission(&mut self, policy: impl AccessPolicy + 'static) {
        self.permission = Some(Arc::new(policy));
    }

    /// Replace the find-many handler slot.
    pub fn set_find_many_handler(&mut self, handler: impl FindManyHandler<R> + 'static) {
        self.find_many = Arc::new(handler);
    }

    /// Replace the find-one handler slot.
    pub fn set_find_one_handler(&mut self, handler: impl FindOneHandler<R> + 'static) {
        self.find_one = Arc::new(handler);
    }

    /// Replace the save handler slot.
    pub fn set_save_handler(&mut self, handler: impl SaveHandler<R> + 'static) {
        self.save = Arc::new(handler);
    }

    /// Replace the delete handler slot.
    pub fn set_delete_handler(&mut self, handler: impl DeleteHandler<R> + 'static) {
        self.delete = Arc::new(handler);
    }

    /// Evaluate the permission gate for an operation mode and caller.
    ///
    /// `true` when no policy is configured; otherwise the policy's verdict
    /// on the caller's roles, unchanged. Pure query.
    pub fn has_permission(&self, mode: PermissionMode, ctx: &OperationContext) -> bool {
        match &self.permission {
            Some(policy) => policy.has_permission(mode, &ctx.roles),
            None => true,
        }
    }

    /// A fresh zero-valued record, independent of every other instance.
    pub fn new_record(&self) -> R {
        R::default()
    }

    /// An empty collection typed for this resource's records.
    pub fn new_collection(&self) -> Vec<R> {
        Vec::new()
    }

    pub(crate) fn find_many_handler(&self) -> &dyn FindManyHandler<R> {
        self.find_many.as_ref()
    }

    pub(crate) fn find_one_handler(&self) -> &dyn FindOneHandler<R> {
        self.find_one.as_ref()
    }

    pub(crate) fn save_handler(&self) -> &dyn SaveHandler<R> {
        self.save.as_ref()
    }

    pub(crate) fn delete_handler(&self) -> &dyn DeleteHandler<R> {
        self.delete.as_ref()
    }

    pub(crate) fn validators(&self) -> &[Box<ValidatorFn<R>>] {
        &self.validators
    }

    pub(crate) fn processors(&self) -> &[Box<ProcessorFn<R>>] {
        &self.processors
    }
}

fn resolve_fields<R: Record>(
    resource_name: &str,
    names: &[&str],
) -> ResourceResult<Vec<&'static str>> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        match R::fields().iter().copied().find(|f| f == name) {
            Some(field) => resolved.push(field),
            None => {
                return Err(ResourceError::configuration(format!(
                    "{name} is not a valid field for resource {resource_name}"
                )));
            }
        }
    }
    Ok(resolved)
}
