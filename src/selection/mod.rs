//! Selection of transfer recipients.
//!
//! A node can hold at most one of three roles: main handler, supporting
//! handler, or informational recipient. `SelectionEngine` keeps one ledger of
//! assignments and pushes the resulting flags onto the tree after each change.

pub mod delegate;
pub mod engine;
pub mod validation;


pub use delegate::{DelegatePicker, FirstDelegate};
pub use engine::SelectionEngine;
pub use validation::{validate_unit_selectable, ValidationError, ValidationErrors};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::organization::{DelegateUser, NodeData, NodeKey, NodeKind, StaffId, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Main,
    Support,
    Know,
}

impl Role {
    /// Display and comment order.
    pub const ALL: [Role; 3] = [Role::Main, Role::Support, Role::Know];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Main => "Main handler",
            Role::Support => "Supporting",
            Role::Know => "For information",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry {
    pub kind: NodeKind,
    pub id: i64,
    pub display_name: String,
    #[serde(default)]
    pub position_name: Option<String>,
    #[serde(default)]
    pub leader_id: Option<StaffId>,
    #[serde(default)]
    pub delegated_id: Option<StaffId>,
    #[serde(default)]
    pub delegated_name: Option<String>,
}

impl SelectionEntry {
    pub fn from_node(node: &TreeNode) -> Self {
        match &node.data {
            NodeData::Unit(unit) => Self {
                kind: NodeKind::Unit,
                id: unit.unit.id,
                display_name: unit.unit.name.clone(),
                position_name: unit.leader.as_ref().and_then(|l| l.position_name.clone()),
                leader_id: unit.leader_id(),
                delegated_id: None,
                delegated_name: None,
            },
            NodeData::Staff(member) => Self {
                kind: NodeKind::Staff,
                id: member.id,
                display_name: member.full_name.clone(),
                position_name: member.position_name.clone(),
                leader_id: None,
                delegated_id: None,
                delegated_name: None,
            },
        }
    }

    pub fn with_delegate(mut self, delegate: &DelegateUser) -> Self {
        self.delegated_id = Some(delegate.id);
        self.delegated_name = Some(delegate.full_name.clone());
        self
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            kind: self.kind,
            id: self.id,
        }
    }

    /// The person this entry ties up: the staff member itself, or a unit's leader.
    pub fn occupied_staff(&self) -> Option<StaffId> {
        match self.kind {
            NodeKind::Staff => Some(self.id),
            NodeKind::Unit => self.leader_id,
        }
    }

    /// Two different entries standing for the same person.
    pub fn is_linked_to(&self, other: &SelectionEntry) -> bool {
        self.key() != other.key()
            && self.occupied_staff().is_some()
            && self.occupied_staff() == other.occupied_staff()
    }
}

/// Snapshot of the three role sets, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectionSets {
    pub main: Vec<SelectionEntry>,
    pub support: Vec<SelectionEntry>,
    pub know: Vec<SelectionEntry>,
}

impl SelectionSets {
    pub fn entries(&self, role: Role) -> &[SelectionEntry] {
        match role {
            Role::Main => &self.main,
            Role::Support => &self.support,
            Role::Know => &self.know,
        }
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.support.len() + self.know.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected(Role),
    Deselected(Role),
    /// Nothing to do: already in, or not in, the requested state.
    Unchanged,
    /// The same person already holds the main role through another node.
    Blocked { by: NodeKey },
    /// The delegate picker was dismissed.
    Cancelled,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectionError {
    #[error("node {0} is not part of the transfer tree")]
    UnknownNode(NodeKey),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
