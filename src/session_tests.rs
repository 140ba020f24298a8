use chrono::{Duration, Local};
use std::sync::Arc;
use uuid::Uuid;

use super::{SessionAction, TransferSession};
use crate::config::TransferConfig;
use crate::organization::{DelegateUser, NodeKey, OrgUnit, StaffMember};
use crate::projection::TransferContext;
use crate::selection::{FirstDelegate, Role, SelectionError, ToggleOutcome};

fn units() -> Vec<OrgUnit> {
    vec![
        OrgUnit::new(1, None, "HQ"),
        OrgUnit::new(2, Some(1), "Dept A"),
        OrgUnit::new(3, Some(1), "Dept B"),
    ]
}

fn staff() -> Vec<StaffMember> {
    vec![
        StaffMember::new(10, "Alice", 2).lead(),
        StaffMember::new(11, "Bob", 2),
        StaffMember::new(20, "Dan", 3),
    ]
}

fn open() -> TransferSession {
    let context = TransferContext::new(Uuid::new_v4(), Some("step-2".to_string()));
    TransferSession::open(context, TransferConfig::default(), &units(), &staff())
}

#[tokio::test]
async fn test_session_projects_current_selection() {
    let mut session = open();

    session.toggle_main(NodeKey::unit(2), true).await.unwrap();
    session.toggle_support(NodeKey::staff(20), true).await.unwrap();

    let payload = session.project();
    assert_eq!(payload.main, vec!["10"]);
    assert_eq!(payload.support, vec!["20"]);
    assert_eq!(payload.comment_prefix, "Main handler: Dept A\nSupporting: Dan");
}

#[tokio::test]
async fn test_retarget_resets_selections() {
    let mut session = open();
    session.toggle_main(NodeKey::staff(11), true).await.unwrap();
    let session_id = session.id();

    let next = TransferContext::new(Uuid::new_v4(), None);
    session.retarget(next.clone());

    assert!(session.selections().is_empty());
    assert_eq!(session.context(), &next);
    assert_eq!(session.id(), session_id);
}

#[tokio::test]
async fn test_rebuild_keeps_surviving_selections() {
    let mut session = open();
    session.toggle_main(NodeKey::staff(11), true).await.unwrap();
    session.toggle_know(NodeKey::staff(20), true).await.unwrap();

    let remaining: Vec<StaffMember> = staff().into_iter().filter(|s| s.id != 20).collect();
    session.rebuild(&units(), &remaining);

    assert!(!session.tree().contains(NodeKey::unit(3)));
    let selections = session.selections();
    assert_eq!(selections.main.len(), 1);
    assert!(selections.know.is_empty());
}

#[tokio::test]
async fn test_rebuild_follows_new_unit_leader() {
    let mut session = open();
    session.toggle_main(NodeKey::unit(2), true).await.unwrap();
    session.toggle_support(NodeKey::staff(11), true).await.unwrap();

    // Bob takes over Dept A.
    let reshuffled = vec![
        StaffMember::new(10, "Alice", 2),
        StaffMember::new(11, "Bob", 2).lead(),
        StaffMember::new(20, "Dan", 3),
    ];
    session.rebuild(&units(), &reshuffled);

    let selections = session.selections();
    assert_eq!(selections.main.len(), 1);
    assert_eq!(selections.main[0].key(), NodeKey::unit(2));
    assert_eq!(selections.main[0].leader_id, Some(11));
    assert!(selections.support.is_empty());
    assert_eq!(session.tree().get(NodeKey::staff(11)).unwrap().selected, None);

    let payload = session.project();
    assert_eq!(payload.main, vec!["11"]);
    assert!(payload.support.is_empty());
}

#[tokio::test]
async fn test_rebuild_lets_linked_main_evict_earlier_support() {
    let mut session = open();
    session.toggle_support(NodeKey::staff(11), true).await.unwrap();
    session.toggle_main(NodeKey::unit(2), true).await.unwrap();

    let reshuffled = vec![
        StaffMember::new(10, "Alice", 2),
        StaffMember::new(11, "Bob", 2).lead(),
        StaffMember::new(20, "Dan", 3),
    ];
    session.rebuild(&units(), &reshuffled);

    let selections = session.selections();
    assert_eq!(selections.main[0].leader_id, Some(11));
    assert!(selections.support.is_empty());
}

#[tokio::test]
async fn test_rebuild_drops_withdrawn_delegate() {
    let config = TransferConfig {
        delegation_mode: true,
        ..TransferConfig::default()
    };
    let with_delegate = vec![
        StaffMember::new(10, "Alice", 2)
            .lead()
            .with_delegates(vec![DelegateUser::new(12, "Carol")]),
        StaffMember::new(11, "Bob", 2),
    ];
    let context = TransferContext::new(Uuid::new_v4(), None);
    let mut session = TransferSession::open(context, config, &units(), &with_delegate)
        .with_delegate_picker(Arc::new(FirstDelegate));
    session.toggle_main(NodeKey::staff(10), true).await.unwrap();

    session.rebuild(&units(), &with_delegate);
    assert_eq!(session.project().main, vec!["10-12"]);

    session.rebuild(&units(), &staff());
    let main = &session.selections().main[0];
    assert_eq!(main.delegated_id, None);
    assert_eq!(main.delegated_name, None);
    assert_eq!(session.project().main, vec!["10"]);
}

#[tokio::test]
async fn test_apply_replays_actions() {
    let mut session = open();
    let actions = vec![
        SessionAction::Toggle {
            role: Role::Main,
            node: NodeKey::unit(2),
            checked: true,
        },
        SessionAction::SelectAll {
            role: Role::Know,
            enable: true,
        },
    ];

    for action in &actions {
        session.apply(action).await.unwrap();
    }

    // Alice is tied up by Dept A; Bob and Dan are free.
    let know: Vec<NodeKey> = session.selections().know.iter().map(|e| e.key()).collect();
    assert_eq!(know, vec![NodeKey::staff(11), NodeKey::staff(20)]);
    assert_eq!(
        session
            .apply(&SessionAction::SelectAll {
                role: Role::Main,
                enable: true
            })
            .await
            .unwrap(),
        ToggleOutcome::Unchanged
    );
}

#[test]
fn test_session_action_json_shape() {
    let json = r#"{ "action": "toggle", "role": "support", "node": { "kind": "staff", "id": 11 }, "checked": true }"#;

    let action: SessionAction = serde_json::from_str(json).unwrap();

    assert_eq!(
        action,
        SessionAction::Toggle {
            role: Role::Support,
            node: NodeKey::staff(11),
            checked: true
        }
    );
}

#[test]
fn test_validate_unit_selectable_reports_unit_name() {
    let session = open();

    let err = session.validate_unit_selectable(NodeKey::unit(3)).unwrap_err();

    match err {
        SelectionError::Validation(e) => {
            assert_eq!(e.field, "unit");
            assert!(e.to_string().contains("Unit Dept B has not designated a leader"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(session.validate_unit_selectable(NodeKey::unit(2)).is_ok());
    assert!(session.validate_unit_selectable(NodeKey::staff(20)).is_ok());
}

#[tokio::test]
async fn test_prepare_submission_collects_all_errors() {
    let session = open();
    let yesterday = Local::now().date_naive() - Duration::days(1);

    let errors = session.prepare_submission("hello", Some(yesterday)).unwrap_err();

    assert_eq!(errors.len(), 2);
    let message = errors.to_message();
    assert!(message.contains("A main handler must be selected"));
    assert!(message.contains("already in the past"));
}

#[tokio::test]
async fn test_prepare_submission_builds_body() {
    let mut session = open();
    session.toggle_main(NodeKey::staff(20), true).await.unwrap();
    let tomorrow = Local::now().date_naive() + Duration::days(1);

    let submission = session.prepare_submission("  see attached ", Some(tomorrow)).unwrap();

    assert_eq!(submission.session_id, session.id());
    assert_eq!(submission.document_id, session.context().document_id);
    assert_eq!(submission.workflow_node_id.as_deref(), Some("step-2"));
    assert_eq!(submission.payload.main, vec!["20"]);
    assert_eq!(submission.comment, "Main handler: Dan\nsee attached");
    assert_eq!(submission.deadline, Some(tomorrow));
}
