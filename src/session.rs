//! One transfer dialog instance.
//!
//! Owns the tree and the selections for a single target document. Nothing is
//! shared between sessions; a session is dropped when its dialog closes.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::TransferConfig;
use crate::organization::{build_selection_tree, BuildOptions, NodeKey, OrgUnit, SelectionTree, StaffMember};
use crate::projection::{project_selections, TransferContext, TransferPayload, TransferSubmission};
use crate::selection::{
    validate_unit_selectable, DelegatePicker, Role, SelectionEngine, SelectionError, SelectionSets,
    ToggleOutcome, ValidationError, ValidationErrors,
};

/// A recorded user interaction, replayable against a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SessionAction {
    Toggle {
        role: Role,
        node: NodeKey,
        checked: bool,
    },
    SelectAll {
        role: Role,
        enable: bool,
    },
}

pub struct TransferSession {
    id: Uuid,
    context: TransferContext,
    config: TransferConfig,
    opened_at: DateTime<Utc>,
    tree: SelectionTree,
    engine: SelectionEngine,
}

impl TransferSession {
    pub fn open(
        context: TransferContext,
        config: TransferConfig,
        units: &[OrgUnit],
        staff: &[StaffMember],
    ) -> Self {
        let id = Uuid::new_v4();
        let tree = build_selection_tree(units, staff, BuildOptions::from(&config));
        log::info!(
            "Transfer session {} opened for document {} (workflow node {:?})",
            id,
            context.document_id,
            context.workflow_node_id
        );

        Self {
            id,
            context,
            engine: SelectionEngine::new(&config),
            config,
            opened_at: Utc::now(),
            tree,
        }
    }

    pub fn with_delegate_picker(mut self, picker: Arc<dyn DelegatePicker>) -> Self {
        self.engine.set_delegate_picker(picker);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &TransferContext {
        &self.context
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    pub fn selections(&self) -> SelectionSets {
        self.engine.snapshot()
    }

    /// Rebuild the tree from fresh lists. Selections whose node survived stay.
    pub fn rebuild(&mut self, units: &[OrgUnit], staff: &[StaffMember]) {
        self.tree = build_selection_tree(units, staff, BuildOptions::from(&self.config));
        self.engine.retain_present(&mut self.tree);
    }

    /// Point the dialog at another document. All selections are cleared.
    pub fn retarget(&mut self, context: TransferContext) {
        log::info!(
            "Transfer session {} retargeted to document {}",
            self.id,
            context.document_id
        );
        self.context = context;
        self.engine.reset(&mut self.tree);
    }

    pub async fn toggle_main(&mut self, key: NodeKey, checked: bool) -> Result<ToggleOutcome, SelectionError> {
        self.engine.toggle_main(&mut self.tree, key, checked).await
    }

    pub async fn toggle_support(&mut self, key: NodeKey, checked: bool) -> Result<ToggleOutcome, SelectionError> {
        self.engine.toggle_support(&mut self.tree, key, checked).await
    }

    pub async fn toggle_know(&mut self, key: NodeKey, checked: bool) -> Result<ToggleOutcome, SelectionError> {
        self.engine.toggle_know(&mut self.tree, key, checked).await
    }

    pub fn select_all_support(&mut self, enable: bool) -> usize {
        self.engine.select_all_support(&mut self.tree, enable)
    }

    pub fn select_all_know(&mut self, enable: bool) -> usize {
        self.engine.select_all_know(&mut self.tree, enable)
    }

    pub fn validate_unit_selectable(&self, key: NodeKey) -> Result<(), SelectionError> {
        let node = self.tree.get(key).ok_or(SelectionError::UnknownNode(key))?;
        validate_unit_selectable(node)?;
        Ok(())
    }

    pub async fn apply(&mut self, action: &SessionAction) -> Result<ToggleOutcome, SelectionError> {
        match *action {
            SessionAction::Toggle { role, node, checked } => {
                self.engine.toggle(&mut self.tree, node, role, checked).await
            }
            SessionAction::SelectAll { role: Role::Support, enable } => {
                self.select_all_support(enable);
                Ok(bulk_outcome(Role::Support, enable))
            }
            SessionAction::SelectAll { role: Role::Know, enable } => {
                self.select_all_know(enable);
                Ok(bulk_outcome(Role::Know, enable))
            }
            SessionAction::SelectAll { role: Role::Main, .. } => {
                log::warn!("Ignoring select-all for the main role");
                Ok(ToggleOutcome::Unchanged)
            }
        }
    }

    pub fn project(&self) -> TransferPayload {
        project_selections(&self.engine.snapshot(), self.config.delegate_encoding)
    }

    /// Validate the form and build the submission body.
    pub fn prepare_submission(
        &self,
        comment: &str,
        deadline: Option<NaiveDate>,
    ) -> Result<TransferSubmission, ValidationErrors> {
        let mut errors = match self.engine.validate_for_submission() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(deadline) = deadline {
            if deadline < Local::now().date_naive() {
                errors.add(ValidationError::deadline_in_past(&deadline.to_string()));
            }
        }
        errors.into_result()?;

        log::info!(
            "Transfer session {} submission prepared {}s after opening",
            self.id,
            (Utc::now() - self.opened_at).num_seconds()
        );
        Ok(TransferSubmission::new(
            self.id,
            &self.context,
            self.project(),
            comment,
            deadline,
        ))
    }
}

fn bulk_outcome(role: Role, enable: bool) -> ToggleOutcome {
    if enable {
        ToggleOutcome::Selected(role)
    } else {
        ToggleOutcome::Deselected(role)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
