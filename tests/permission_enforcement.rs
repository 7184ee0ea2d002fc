//! Permission gate behavior through the public facade: unrestricted
//! resources, role-table policies, and denial side effects.

mod common;

use common::{article, article_resource};
use crudbase::{
    ANYONE, AccessPolicy, FieldValues, OperationContext, PermissionMode, ResourceError, RolePolicy,
};
use proptest::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_role_policy_gates_operations() {
    let (mut resource, store) = article_resource();
    resource.set_permission(
        RolePolicy::new()
            .allow(PermissionMode::Read, [ANYONE])
            .allow(PermissionMode::Create, ["editor"])
            .allow(PermissionMode::Update, ["editor"])
            .allow(PermissionMode::Delete, ["admin"]),
    );

    let editor = OperationContext::default().with_roles(["editor"]);
    let viewer = OperationContext::default().with_roles(["viewer"]);
    let admin = OperationContext::default().with_roles(["admin"]);

    let mut record = article("a-1", "hello");
    resource
        .call_save(&mut record, &FieldValues::new(), &editor)
        .await
        .unwrap();

    // Read is open to anyone.
    let mut list = resource.new_collection();
    resource.call_find_many(&mut list, &viewer).await.unwrap();
    assert_eq!(list.len(), 1);

    // A denied save changes nothing.
    let mut defaced = article("a-1", "defaced");
    let err = resource
        .call_save(&mut defaced, &FieldValues::new(), &viewer)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::PermissionDenied { .. }));

    let mut stored = resource.new_record();
    let values = FieldValues::new().with("id", json!("a-1"));
    resource
        .call_find_one(&mut stored, &values, &viewer)
        .await
        .unwrap();
    assert_eq!(stored.title, "hello");

    // Delete requires admin.
    let mut denied = record.clone();
    let err = resource
        .call_delete(&mut denied, &FieldValues::new(), &editor)
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::PermissionDenied { .. }));

    resource
        .call_delete(&mut record, &FieldValues::new(), &admin)
        .await
        .unwrap();
    assert_eq!(store.stats().await.total_rows, 0);
}

#[tokio::test]
async fn test_save_mode_selects_create_or_update() {
    let (mut resource, _store) = article_resource();
    resource.set_permission(RolePolicy::new().allow(PermissionMode::Create, ["intake"]));
    let intake = OperationContext::default().with_roles(["intake"]);

    // A fresh record (zero-valued primary) is a create.
    let mut fresh = article("", "new");
    resource
        .call_save(&mut fresh, &FieldValues::new(), &intake)
        .await
        .unwrap();
    assert!(!fresh.id.is_empty());

    // The same record now carries a primary value, so saving again is an
    // update, which this policy does not grant.
    let err = resource
        .call_save(&mut fresh, &FieldValues::new(), &intake)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResourceError::PermissionDenied {
            mode: PermissionMode::Update,
            ..
        }
    ));
}

#[test]
fn test_gate_returns_policy_verdict_unchanged() {
    struct DenyAll;

    impl AccessPolicy for DenyAll {
        fn has_permission(&self, _mode: PermissionMode, _roles: &[String]) -> bool {
            false
        }
    }

    let (mut resource, _store) = article_resource();
    resource.set_permission(DenyAll);
    let ctx = OperationContext::default().with_roles(["admin"]);
    for mode in PermissionMode::ALL {
        assert!(!resource.has_permission(mode, &ctx));
    }
}

proptest! {
    // Without a policy, every mode is granted to every role set, including
    // the empty one.
    #[test]
    fn prop_unrestricted_resource_always_grants(
        mode_index in 0usize..4,
        roles in proptest::collection::vec("[a-z]{1,8}", 0..5),
    ) {
        let (resource, _store) = article_resource();
        let ctx = OperationContext::new("prop").with_roles(roles);
        prop_assert!(resource.has_permission(PermissionMode::ALL[mode_index], &ctx));
    }
}
