//! Handler strategies for the four canonical operations.
//!
//! Each operation is routed through one of four single-method traits so any
//! slot can be replaced independently (swap the save handler to write to a
//! different backing store, wrap the default delete with an audit step)
//! without changing the facade contract callers see. [`StoreBacked`] is the
//! default implementation of all four, delegating to a [`Datastore`] using
//! the resource's primary-field set to build lookup predicates.

use crate::context::OperationContext;
use crate::datastore::{Datastore, describe_predicate};
use crate::error::{ResourceError, ResourceResult};
use crate::record::Record;
use crate::resource::Descriptor;
use crate::values::FieldValues;
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Strategy for the find-many operation: fill `target` with every matching
/// record.
#[async_trait]
pub trait FindManyHandler<R: Record>: Send + Sync {
    async fn find_many(
        &self,
        descriptor: &Descriptor,
        target: &mut Vec<R>,
        ctx: &OperationContext,
    ) -> ResourceResult<()>;
}

/// Strategy for the find-one operation: locate the record identified by the
/// submitted field values and write it into `target`.
///
/// Zero matches must surface as [`ResourceError::NotFound`] so callers can
/// render "no results" distinctly from a system fault.
#[async_trait]
pub trait FindOneHandler<R: Record>: Send + Sync {
    async fn find_one(
        &self,
        descriptor: &Descriptor,
        target: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()>;
}

/// Strategy for the save operation: persist `record`, writing back whatever
/// the backing store materialized (generated keys included).
#[async_trait]
pub trait SaveHandler<R: Record>: Send + Sync {
    async fn save(
        &self,
        descriptor: &Descriptor,
        record: &mut R,
        ctx: &OperationContext,
    ) -> ResourceResult<()>;
}

/// Strategy for the delete operation: remove the stored record identified by
/// `record`'s primary fields.
#[async_trait]
pub trait DeleteHandler<R: Record>: Send + Sync {
    async fn delete(
        &self,
        descriptor: &Descriptor,
        record: &R,
        ctx: &OperationContext,
    ) -> ResourceResult<()>;
}

/// Default handler set: every operation delegates to a [`Datastore`].
#[derive(Debug, Clone)]
pub struct StoreBacked<D> {
    store: D,
}

impl<D> StoreBacked<D> {
    pub fn new(store: D) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: Record, D: Datastore> FindManyHandler<R> for StoreBacked<D> {
    async fn find_many(
        &self,
        descriptor: &Descriptor,
        target: &mut Vec<R>,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        let rows = self
            .store
            .fetch_all(R::record_name())
            .await
            .map_err(ResourceError::datastore)?;
        debug!(
            "[{}] {}: fetched {} rows",
            ctx.request_id,
            descriptor.name(),
            rows.len()
        );

        target.clear();
        for row in rows {
            target.push(serde_json::from_value(row)?);
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record, D: Datastore> FindOneHandler<R> for StoreBacked<D> {
    async fn find_one(
        &self,
        descriptor: &Descriptor,
        target: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        let predicate = predicate_from_values(descriptor, values)?;
        debug!(
            "[{}] {}: looking up {}",
            ctx.request_id,
            descriptor.name(),
            describe_predicate(&predicate)
        );

        match self
            .store
            .fetch_one(R::record_name(), &predicate)
            .await
            .map_err(ResourceError::datastore)?
        {
            Some(row) => {
                *target = serde_json::from_value(row)?;
                Ok(())
            }
            None => Err(ResourceError::not_found(descriptor.name())),
        }
    }
}

#[async_trait]
impl<R: Record, D: Datastore> SaveHandler<R> for StoreBacked<D> {
    async fn save(
        &self,
        descriptor: &Descriptor,
        record: &mut R,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        let mut data = serde_json::to_value(&*record)?;
        let object = data.as_object_mut().ok_or_else(|| {
            ResourceError::invalid_request("record must serialize to a JSON object")
        })?;

        // A single string-shaped primary field left empty gets a generated
        // key; composite and numeric keys are stored as submitted.
        if let [field] = descriptor.primary_fields() {
            if needs_generated_key(object.get(*field)) {
                let key = Uuid::new_v4().to_string();
                debug!(
                    "[{}] {}: generated primary key {}",
                    ctx.request_id,
                    descriptor.name(),
                    key
                );
                object.insert((*field).to_string(), Value::String(key));
            }
        }

        let predicate = predicate_from_object(descriptor, object);
        let stored = self
            .store
            .put(R::record_name(), &predicate, data)
            .await
            .map_err(ResourceError::datastore)?;
        *record = serde_json::from_value(stored)?;
        Ok(())
    }
}

#[async_trait]
impl<R: Record, D: Datastore> DeleteHandler<R> for StoreBacked<D> {
    async fn delete(
        &self,
        descriptor: &Descriptor,
        record: &R,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        let data = serde_json::to_value(record)?;
        let object = data.as_object().ok_or_else(|| {
            ResourceError::invalid_request("record must serialize to a JSON object")
        })?;

        for field in descriptor.primary_fields() {
            if needs_generated_key(object.get(*field)) {
                return Err(ResourceError::invalid_request(format!(
                    "missing primary field value '{field}'"
                )));
            }
        }

        let predicate = predicate_from_object(descriptor, object);
        debug!(
            "[{}] {}: deleting {}",
            ctx.request_id,
            descriptor.name(),
            describe_predicate(&predicate)
        );

        let removed = self
            .store
            .remove(R::record_name(), &predicate)
            .await
            .map_err(ResourceError::datastore)?;
        if removed {
            Ok(())
        } else {
            Err(ResourceError::not_found(descriptor.name()))
        }
    }
}

fn predicate_from_object(
    descriptor: &Descriptor,
    object: &Map<String, Value>,
) -> Vec<(String, Value)> {
    descriptor
        .primary_fields()
        .iter()
        .map(|field| {
            (
                (*field).to_string(),
                object.get(*field).cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}

fn predicate_from_values(
    descriptor: &Descriptor,
    values: &FieldValues,
) -> ResourceResult<Vec<(String, Value)>> {
    descriptor
        .primary_fields()
        .iter()
        .map(|field| match values.get(field) {
            Some(value) => Ok(((*field).to_string(), value.clone())),
            None => Err(ResourceError::invalid_request(format!(
                "missing primary field value '{field}'"
            ))),
        })
        .collect()
}

fn needs_generated_key(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::MemoryDatastore;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Article {
        id: String,
        title: String,
    }

    impl Record for Article {
        fn fields() -> &'static [&'static str] {
            &["id", "title"]
        }
    }

    fn descriptor() -> Descriptor {
        // Build through the facade so the descriptor matches real usage.
        crate::Resource::<Article, _>::new(MemoryDatastore::new())
            .unwrap()
            .descriptor()
            .clone()
    }

    #[tokio::test]
    async fn test_save_generates_key_for_empty_string_primary() {
        let store = MemoryDatastore::new();
        let handlers = StoreBacked::new(store.clone());
        let ctx = OperationContext::default();
        let mut article = Article {
            id: String::new(),
            title: "hello".into(),
        };

        SaveHandler::save(&handlers, &descriptor(), &mut article, &ctx)
            .await
            .unwrap();
        assert!(!article.id.is_empty());
        assert_eq!(store.stats().await.total_rows, 1);
    }

    #[tokio::test]
    async fn test_save_preserves_submitted_key() {
        let handlers = StoreBacked::new(MemoryDatastore::new());
        let ctx = OperationContext::default();
        let mut article = Article {
            id: "a-1".into(),
            title: "hello".into(),
        };

        SaveHandler::save(&handlers, &descriptor(), &mut article, &ctx)
            .await
            .unwrap();
        assert_eq!(article.id, "a-1");
    }

    #[tokio::test]
    async fn test_find_one_requires_every_primary_value() {
        let handlers = StoreBacked::new(MemoryDatastore::new());
        let ctx = OperationContext::default();
        let mut target = Article::default();

        let err = FindOneHandler::find_one(
            &handlers,
            &descriptor(),
            &mut target,
            &FieldValues::new(),
            &ctx,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResourceError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_find_one_distinguishes_not_found() {
        let handlers = StoreBacked::new(MemoryDatastore::new());
        let ctx = OperationContext::default();
        let mut target = Article::default();
        let values = FieldValues::new().with("id", json!("missing"));

        let err = FindOneHandler::find_one(&handlers, &descriptor(), &mut target, &values, &ctx)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_not_found() {
        let handlers = StoreBacked::new(MemoryDatastore::new());
        let ctx = OperationContext::default();
        let article = Article {
            id: "a-1".into(),
            title: "hello".into(),
        };

        let err = DeleteHandler::delete(&handlers, &descriptor(), &article, &ctx)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_primary_value() {
        let handlers = StoreBacked::new(MemoryDatastore::new());
        let ctx = OperationContext::default();
        let article = Article::default();

        let err = DeleteHandler::delete(&handlers, &descriptor(), &article, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::InvalidRequest { .. }));
    }
}
