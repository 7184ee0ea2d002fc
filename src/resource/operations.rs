//! The four canonical facade operations.
//!
//! Every operation checks the permission gate first. The two mutating
//! operations then open a datastore transaction, run the processor chain and
//! the validator chain (in that order, each in registration order, failing
//! fast), and finally dispatch to the handler slot. The transaction commits
//! only after the handler succeeds; any stage or handler failure rolls it
//! back and restores the candidate record to its pre-pipeline state, so a
//! failed call leaves neither durable nor in-memory partial effects.

use crate::context::OperationContext;
use crate::datastore::{Datastore, StoreTransaction};
use crate::error::{ResourceError, ResourceResult};
use crate::permission::PermissionMode;
use crate::record::Record;
use crate::resource::Resource;
use crate::values::FieldValues;
use log::{debug, info, warn};
use serde_json::Value;

impl<R: Record, D: Datastore> Resource<R, D> {
    /// Find every record of this resource and fill `target` with the result.
    ///
    /// Zero matches is an empty collection, not an error.
    pub async fn call_find_many(
        &self,
        target: &mut Vec<R>,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        self.check_permission(PermissionMode::Read, ctx)?;
        self.find_many_handler()
            .find_many(self.descriptor(), target, ctx)
            .await
    }

    /// Find the single record identified by the submitted field values and
    /// write it into `target`.
    pub async fn call_find_one(
        &self,
        target: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        self.check_permission(PermissionMode::Read, ctx)?;
        self.find_one_handler()
            .find_one(self.descriptor(), target, values, ctx)
            .await
    }

    /// Persist `record` through the pipeline: processors, validators, then
    /// the save handler, inside one transactional scope.
    ///
    /// The gate mode is `Create` when the record's primary value is still
    /// zero-valued, `Update` otherwise.
    pub async fn call_save(
        &self,
        record: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        let mode = self.save_mode(record)?;
        self.check_permission(mode, ctx)?;
        debug!("[{}] {} {}", ctx.request_id, mode, self.name());

        let tx = self
            .store()
            .begin(R::record_name())
            .await
            .map_err(ResourceError::datastore)?;
        let checkpoint = record.clone();

        let outcome = match self.run_chains(record, values, ctx) {
            Ok(()) => self.save_handler().save(self.descriptor(), record, ctx).await,
            Err(error) => Err(error),
        };

        match outcome {
            Ok(()) => {
                tx.commit().await.map_err(ResourceError::datastore)?;
                info!("[{}] saved {}", ctx.request_id, self.name());
                Ok(())
            }
            Err(error) => {
                *record = checkpoint;
                self.roll_back(tx, ctx).await;
                Err(error)
            }
        }
    }

    /// Remove the stored record identified by `record`, through the same
    /// pipeline and transactional scope as [`call_save`](Self::call_save).
    pub async fn call_delete(
        &self,
        record: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        self.check_permission(PermissionMode::Delete, ctx)?;
        debug!("[{}] delete {}", ctx.request_id, self.name());

        let tx = self
            .store()
            .begin(R::record_name())
            .await
            .map_err(ResourceError::datastore)?;
        let checkpoint = record.clone();

        let outcome = match self.run_chains(record, values, ctx) {
            Ok(()) => {
                self.delete_handler()
                    .delete(self.descriptor(), record, ctx)
                    .await
            }
            Err(error) => Err(error),
        };

        match outcome {
            Ok(()) => {
                tx.commit().await.map_err(ResourceError::datastore)?;
                info!("[{}] deleted {}", ctx.request_id, self.name());
                Ok(())
            }
            Err(error) => {
                *record = checkpoint;
                self.roll_back(tx, ctx).await;
                Err(error)
            }
        }
    }

    fn run_chains(
        &self,
        record: &mut R,
        values: &FieldValues,
        ctx: &OperationContext,
    ) -> ResourceResult<()> {
        for (index, processor) in self.processors().iter().enumerate() {
            if let Err(message) = processor(record, values, ctx) {
                warn!(
                    "[{}] {}: processor {} failed: {}",
                    ctx.request_id,
                    self.name(),
                    index,
                    message
                );
                return Err(ResourceError::Processing { message });
            }
        }
        for (index, validator) in self.validators().iter().enumerate() {
            if let Err(message) = validator(record, values, ctx) {
                warn!(
                    "[{}] {}: validator {} rejected: {}",
                    ctx.request_id,
                    self.name(),
                    index,
                    message
                );
                return Err(ResourceError::Validation { message });
            }
        }
        Ok(())
    }

    fn check_permission(&self, mode: PermissionMode, ctx: &OperationContext) -> ResourceResult<()> {
        if self.has_permission(mode, ctx) {
            Ok(())
        } else {
            warn!(
                "[{}] permission denied: {} on {}",
                ctx.request_id,
                mode,
                self.name()
            );
            Err(ResourceError::permission_denied(self.name(), mode))
        }
    }

    fn save_mode(&self, record: &R) -> ResourceResult<PermissionMode> {
        let data = serde_json::to_value(record)?;
        let fresh = self
            .primary_fields()
            .iter()
            .all(|field| is_zero_value(data.get(*field)));
        Ok(if fresh {
            PermissionMode::Create
        } else {
            PermissionMode::Update
        })
    }

    async fn roll_back(&self, tx: D::Tx, ctx: &OperationContext) {
        if let Err(error) = tx.rollback().await {
            warn!(
                "[{}] rollback failed for {}: {}",
                ctx.request_id,
                self.name(),
                error
            );
        }
    }
}

fn is_zero_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
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

    #[test]
    fn test_is_zero_value() {
        assert!(is_zero_value(None));
        assert!(is_zero_value(Some(&Value::Null)));
        assert!(is_zero_value(Some(&json!(""))));
        assert!(is_zero_value(Some(&json!(0))));
        assert!(!is_zero_value(Some(&json!("a-1"))));
        assert!(!is_zero_value(Some(&json!(7))));
    }

    #[tokio::test]
    async fn test_save_mode_tracks_primary_value() {
        let resource = Resource::<Article, _>::new(MemoryDatastore::new()).unwrap();

        let fresh = Article::default();
        assert_eq!(resource.save_mode(&fresh).unwrap(), PermissionMode::Create);

        let existing = Article {
            id: "a-1".into(),
            title: "t".into(),
        };
        assert_eq!(
            resource.save_mode(&existing).unwrap(),
            PermissionMode::Update
        );
    }
}
