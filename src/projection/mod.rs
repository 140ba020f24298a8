//! Flattens role selections into what the transfer API accepts.
//!
//! Units are never sent themselves, only their resolved leader.

pub mod submission;

#[cfg(test)]
mod tests;

pub use submission::{compose_comment, TransferContext, TransferSubmission};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::config::ConfigError;
use crate::organization::NodeKind;
use crate::selection::{Role, SelectionEntry, SelectionSets};

/// How "acting for" relationships reach the transfer API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DelegateEncoding {
    /// `"{id}-{delegated_id}"` in the id list.
    #[default]
    Combined,
    /// Bare id in the list plus a separate `Delegation` record.
    Separate,
}

impl FromStr for DelegateEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(DelegateEncoding::Combined),
            "separate" => Ok(DelegateEncoding::Separate),
            other => Err(ConfigError::InvalidEncoding(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub role: Role,
    pub user_id: String,
    pub delegated_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub main: Vec<String>,
    pub support: Vec<String>,
    pub know: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegations: Vec<Delegation>,
    pub comment_prefix: String,
}

impl TransferPayload {
    pub fn ids(&self, role: Role) -> &[String] {
        match role {
            Role::Main => &self.main,
            Role::Support => &self.support,
            Role::Know => &self.know,
        }
    }
}

pub fn project_selections(sets: &SelectionSets, encoding: DelegateEncoding) -> TransferPayload {
    let mut delegations = Vec::new();
    let main = project_role(sets.entries(Role::Main), Role::Main, encoding, &mut delegations);
    let support = project_role(
        sets.entries(Role::Support),
        Role::Support,
        encoding,
        &mut delegations,
    );
    let know = project_role(sets.entries(Role::Know), Role::Know, encoding, &mut delegations);

    TransferPayload {
        main,
        support,
        know,
        delegations,
        comment_prefix: comment_prefix(sets),
    }
}

fn project_role(
    entries: &[SelectionEntry],
    role: Role,
    encoding: DelegateEncoding,
    delegations: &mut Vec<Delegation>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(entries.len());

    for entry in entries {
        let id = match entry.kind {
            NodeKind::Staff => entry.id,
            NodeKind::Unit => match entry.leader_id {
                Some(leader) => leader,
                None => {
                    log::warn!("Unit {} has no leader, left out of {:?}", entry.id, role);
                    continue;
                }
            },
        };
        if !seen.insert(id) {
            continue;
        }

        match (encoding, entry.delegated_id) {
            (DelegateEncoding::Combined, Some(delegated)) => ids.push(format!("{}-{}", id, delegated)),
            (DelegateEncoding::Separate, Some(delegated)) => {
                ids.push(id.to_string());
                delegations.push(Delegation {
                    role,
                    user_id: id.to_string(),
                    delegated_id: delegated.to_string(),
                });
            }
            (_, None) => ids.push(id.to_string()),
        }
    }

    ids
}

/// One line per non-empty role, main first, e.g. `Main handler: Dept A`.
pub fn comment_prefix(sets: &SelectionSets) -> String {
    let lines: Vec<String> = Role::ALL
        .iter()
        .filter_map(|role| {
            let names: Vec<String> = sets.entries(*role).iter().map(entry_label).collect();
            if names.is_empty() {
                None
            } else {
                Some(format!("{}: {}", role.label(), names.join(", ")))
            }
        })
        .collect();

    lines.join("\n")
}

fn entry_label(entry: &SelectionEntry) -> String {
    match &entry.delegated_name {
        Some(delegated) => format!("{} (delegated to {})", entry.display_name, delegated),
        None => entry.display_name.clone(),
    }
}
