#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use crate::organization::NodeKind;
    use crate::projection::{
        comment_prefix, compose_comment, project_selections, DelegateEncoding, Delegation,
        TransferContext, TransferSubmission,
    };
    use crate::selection::{Role, SelectionEntry, SelectionSets};

    fn staff(id: i64, name: &str) -> SelectionEntry {
        SelectionEntry {
            kind: NodeKind::Staff,
            id,
            display_name: name.to_string(),
            position_name: None,
            leader_id: None,
            delegated_id: None,
            delegated_name: None,
        }
    }

    fn unit(id: i64, name: &str, leader_id: Option<i64>) -> SelectionEntry {
        SelectionEntry {
            kind: NodeKind::Unit,
            leader_id,
            ..staff(id, name)
        }
    }

    fn delegated(mut entry: SelectionEntry, id: i64, name: &str) -> SelectionEntry {
        entry.delegated_id = Some(id);
        entry.delegated_name = Some(name.to_string());
        entry
    }

    #[test]
    fn test_units_project_to_their_leader() {
        let sets = SelectionSets {
            main: vec![unit(2, "Dept A", Some(10))],
            support: vec![staff(11, "Bob")],
            know: vec![],
        };

        let payload = project_selections(&sets, DelegateEncoding::Combined);

        assert_eq!(payload.main, vec!["10"]);
        assert_eq!(payload.support, vec!["11"]);
        assert!(payload.know.is_empty());
        assert!(payload.delegations.is_empty());
    }

    #[test]
    fn test_leaderless_unit_is_left_out() {
        let sets = SelectionSets {
            know: vec![unit(3, "Dept B", None), staff(20, "Dan")],
            ..SelectionSets::default()
        };

        let payload = project_selections(&sets, DelegateEncoding::Combined);

        assert_eq!(payload.know, vec!["20"]);
    }

    #[test]
    fn test_unit_and_its_leader_dedup_within_role() {
        let sets = SelectionSets {
            support: vec![unit(2, "Dept A", Some(10)), staff(10, "Alice"), staff(11, "Bob")],
            ..SelectionSets::default()
        };

        let payload = project_selections(&sets, DelegateEncoding::Combined);

        assert_eq!(payload.support, vec!["10", "11"]);
    }

    #[rstest]
    #[case(DelegateEncoding::Combined, vec!["30-31"], vec![])]
    #[case(
        DelegateEncoding::Separate,
        vec!["30"],
        vec![Delegation { role: Role::Main, user_id: "30".to_string(), delegated_id: "31".to_string() }]
    )]
    fn test_delegate_encoding(
        #[case] encoding: DelegateEncoding,
        #[case] expected_main: Vec<&str>,
        #[case] expected_delegations: Vec<Delegation>,
    ) {
        let sets = SelectionSets {
            main: vec![delegated(staff(30, "Eve"), 31, "Frank")],
            ..SelectionSets::default()
        };

        let payload = project_selections(&sets, encoding);

        assert_eq!(payload.main, expected_main);
        assert_eq!(payload.delegations, expected_delegations);
    }

    #[test]
    fn test_delegate_on_unit_applies_to_leader() {
        let sets = SelectionSets {
            main: vec![delegated(unit(4, "Dept C", Some(30)), 31, "Frank")],
            ..SelectionSets::default()
        };

        let payload = project_selections(&sets, DelegateEncoding::Combined);

        assert_eq!(payload.main, vec!["30-31"]);
    }

    #[test]
    fn test_comment_prefix_lists_roles_in_fixed_order() {
        let sets = SelectionSets {
            main: vec![unit(2, "Dept A", Some(10))],
            support: vec![],
            know: vec![staff(11, "Bob"), delegated(staff(30, "Eve"), 31, "Frank")],
        };

        let prefix = comment_prefix(&sets);

        assert_eq!(
            prefix,
            "Main handler: Dept A\nFor information: Bob, Eve (delegated to Frank)"
        );
    }

    #[test]
    fn test_empty_selection_has_empty_prefix() {
        assert_eq!(comment_prefix(&SelectionSets::default()), "");
    }

    #[rstest]
    #[case("", "  please review ", "please review")]
    #[case("Main handler: Dept A", "", "Main handler: Dept A")]
    #[case("Main handler: Dept A", "urgent", "Main handler: Dept A\nurgent")]
    fn test_compose_comment(#[case] prefix: &str, #[case] free_text: &str, #[case] expected: &str) {
        assert_eq!(compose_comment(prefix, free_text), expected);
    }

    #[test]
    fn test_submission_serializes_flattened_payload() {
        let sets = SelectionSets {
            main: vec![staff(11, "Bob")],
            ..SelectionSets::default()
        };
        let context = TransferContext::new(Uuid::new_v4(), Some("review".to_string()));
        let payload = project_selections(&sets, DelegateEncoding::Combined);

        let submission = TransferSubmission::new(Uuid::new_v4(), &context, payload, "thanks", None);
        let json = serde_json::to_value(&submission).unwrap();

        assert_eq!(json["main"][0], "11");
        assert_eq!(json["workflowNodeId"], "review");
        assert_eq!(json["comment"], "Main handler: Bob\nthanks");
        assert!(json.get("delegations").is_none());
        assert_eq!(json["documentId"], context.document_id.to_string());
    }

    #[test]
    fn test_parse_delegate_encoding() {
        assert_eq!("Separate".parse::<DelegateEncoding>().unwrap(), DelegateEncoding::Separate);
        assert_eq!("combined".parse::<DelegateEncoding>().unwrap(), DelegateEncoding::Combined);
        assert!("both".parse::<DelegateEncoding>().is_err());
    }
}
