use std::collections::HashMap;
use std::sync::Arc;

use super::delegate::DelegatePicker;
use super::validation::{validate_unit_selectable, ValidationError, ValidationErrors};
use super::{Role, SelectionEntry, SelectionError, SelectionSets, ToggleOutcome};
use crate::config::TransferConfig;
use crate::organization::{DelegateUser, NodeData, NodeKey, SelectionTree, TreeNode};

#[derive(Debug, Clone)]
struct Assignment {
    role: Role,
    entry: SelectionEntry,
}

/// Owns the role assignments of one transfer dialog.
///
/// The ledger is the only source of truth: each `NodeKey` appears in it at
/// most once, and the per-node flags on the tree are rewritten from it after
/// every mutation.
pub struct SelectionEngine {
    multi_select_main: bool,
    delegation_mode: bool,
    picker: Option<Arc<dyn DelegatePicker>>,
    assignments: Vec<Assignment>,
    bulk_support: bool,
    bulk_know: bool,
}

impl SelectionEngine {
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            multi_select_main: config.multi_select_main,
            delegation_mode: config.delegation_mode,
            picker: None,
            assignments: Vec::new(),
            bulk_support: false,
            bulk_know: false,
        }
    }

    pub fn with_delegate_picker(mut self, picker: Arc<dyn DelegatePicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn set_delegate_picker(&mut self, picker: Arc<dyn DelegatePicker>) {
        self.picker = Some(picker);
    }

    pub fn role_of(&self, key: NodeKey) -> Option<Role> {
        self.assignments
            .iter()
            .find(|a| a.entry.key() == key)
            .map(|a| a.role)
    }

    pub fn entries(&self, role: Role) -> Vec<&SelectionEntry> {
        self.assignments
            .iter()
            .filter(|a| a.role == role)
            .map(|a| &a.entry)
            .collect()
    }

    pub fn snapshot(&self) -> SelectionSets {
        let collect = |role: Role| -> Vec<SelectionEntry> {
            self.entries(role).into_iter().cloned().collect()
        };
        SelectionSets {
            main: collect(Role::Main),
            support: collect(Role::Support),
            know: collect(Role::Know),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn is_bulk_enabled(&self, role: Role) -> bool {
        match role {
            Role::Main => false,
            Role::Support => self.bulk_support,
            Role::Know => self.bulk_know,
        }
    }

    fn set_bulk(&mut self, role: Role, enabled: bool) {
        match role {
            Role::Main => {}
            Role::Support => self.bulk_support = enabled,
            Role::Know => self.bulk_know = enabled,
        }
    }

    /// Clear every selection, e.g. when the dialog opens for a new target.
    pub fn reset(&mut self, tree: &mut SelectionTree) {
        self.assignments.clear();
        self.bulk_support = false;
        self.bulk_know = false;
        self.sync(tree);
    }

    pub async fn toggle_main(
        &mut self,
        tree: &mut SelectionTree,
        key: NodeKey,
        checked: bool,
    ) -> Result<ToggleOutcome, SelectionError> {
        self.toggle(tree, key, Role::Main, checked).await
    }

    pub async fn toggle_support(
        &mut self,
        tree: &mut SelectionTree,
        key: NodeKey,
        checked: bool,
    ) -> Result<ToggleOutcome, SelectionError> {
        self.toggle(tree, key, Role::Support, checked).await
    }

    pub async fn toggle_know(
        &mut self,
        tree: &mut SelectionTree,
        key: NodeKey,
        checked: bool,
    ) -> Result<ToggleOutcome, SelectionError> {
        self.toggle(tree, key, Role::Know, checked).await
    }

    /// Tick or untick `key` for `role`.
    ///
    /// Leaderless or uncheckable units are rejected before any state changes.
    /// In delegation mode a main or support tick with delegates on offer waits
    /// for the picker; dismissing it leaves everything as it was.
    pub async fn toggle(
        &mut self,
        tree: &mut SelectionTree,
        key: NodeKey,
        role: Role,
        checked: bool,
    ) -> Result<ToggleOutcome, SelectionError> {
        let node = tree.get(key).ok_or(SelectionError::UnknownNode(key))?;
        validate_unit_selectable(node)?;

        if !checked {
            return Ok(self.deselect(tree, key, role));
        }
        if self.role_of(key) == Some(role) {
            return Ok(ToggleOutcome::Unchanged);
        }

        let mut entry = SelectionEntry::from_node(node);
        let delegates = delegates_of(node);

        if let Some(by) = self.blocker(&entry, role) {
            log::warn!("{} cannot be selected as {:?}: {} already holds the main role", key, role, by);
            return Ok(ToggleOutcome::Blocked { by });
        }

        if self.delegation_mode && role != Role::Know && !delegates.is_empty() {
            match self.picker.clone() {
                Some(picker) => {
                    let choice = picker.choose(&entry, &delegates).await;
                    match choice {
                        Some(delegate) => entry = entry.with_delegate(&delegate),
                        None => {
                            log::debug!("Delegate choice for {} cancelled", key);
                            return Ok(ToggleOutcome::Cancelled);
                        }
                    }
                }
                None => {
                    log::warn!("Delegation mode is on but no delegate picker is set; committing {} directly", key);
                }
            }
        }

        self.commit(entry, role);
        self.sync(tree);
        Ok(ToggleOutcome::Selected(role))
    }

    /// A linked entry already in main keeps support and know away from the
    /// same person.
    fn blocker(&self, entry: &SelectionEntry, role: Role) -> Option<NodeKey> {
        if role == Role::Main {
            return None;
        }
        self.assignments
            .iter()
            .find(|a| a.role == Role::Main && a.entry.is_linked_to(entry))
            .map(|a| a.entry.key())
    }

    fn commit(&mut self, entry: SelectionEntry, role: Role) {
        let key = entry.key();

        if role == Role::Main && !self.multi_select_main {
            self.remove_where(|a| a.role == Role::Main && a.entry.key() != key);
        }
        self.remove_where(|a| {
            a.entry.key() == key || (a.role != role && a.entry.is_linked_to(&entry))
        });

        log::debug!("{} selected as {:?}", key, role);
        self.assignments.push(Assignment { role, entry });
    }

    /// Drop matching assignments. Losing a member clears that role's bulk flag.
    fn remove_where(&mut self, mut predicate: impl FnMut(&Assignment) -> bool) {
        let mut touched = Vec::new();
        self.assignments.retain(|a| {
            if predicate(a) {
                log::debug!("{} evicted from {:?}", a.entry.key(), a.role);
                touched.push(a.role);
                false
            } else {
                true
            }
        });
        for role in touched {
            self.set_bulk(role, false);
        }
    }

    fn deselect(&mut self, tree: &mut SelectionTree, key: NodeKey, role: Role) -> ToggleOutcome {
        if self.role_of(key) != Some(role) {
            return ToggleOutcome::Unchanged;
        }
        self.remove_where(|a| a.entry.key() == key);
        self.sync(tree);
        ToggleOutcome::Deselected(role)
    }

    pub fn select_all_support(&mut self, tree: &mut SelectionTree, enable: bool) -> usize {
        self.select_all(tree, Role::Support, enable)
    }

    pub fn select_all_know(&mut self, tree: &mut SelectionTree, enable: bool) -> usize {
        self.select_all(tree, Role::Know, enable)
    }

    /// Bulk toggle for support or know. Returns how many entries changed.
    ///
    /// Turning on adds every staff node and every eligible unit that nobody
    /// else holds, skipping people already taken by another role (a leader
    /// whose unit is main stays out). Turning off empties the role entirely.
    fn select_all(&mut self, tree: &mut SelectionTree, role: Role, enable: bool) -> usize {
        debug_assert!(role != Role::Main, "main has no bulk toggle");

        if !enable {
            let before = self.assignments.len();
            self.assignments.retain(|a| a.role != role);
            self.set_bulk(role, false);
            self.sync(tree);
            let removed = before - self.assignments.len();
            log::info!("Bulk {:?} cleared, {} entries removed", role, removed);
            return removed;
        }

        let candidates: Vec<SelectionEntry> = tree
            .iter()
            .filter(|node| is_bulk_candidate(node))
            .map(SelectionEntry::from_node)
            .collect();

        let mut added = 0;
        for entry in candidates {
            if self.role_of(entry.key()).is_some() {
                continue;
            }
            let taken = self
                .assignments
                .iter()
                .any(|a| a.role != role && a.entry.is_linked_to(&entry));
            if taken {
                continue;
            }
            self.assignments.push(Assignment { role, entry });
            added += 1;
        }

        self.set_bulk(role, true);
        self.sync(tree);
        log::info!("Bulk {:?} enabled, {} entries added", role, added);
        added
    }

    /// Carry selections over to a rebuilt tree.
    ///
    /// Entries are re-read from their node, so a unit picks up its new
    /// leader. A delegate survives only while it is still offered. The
    /// commit rules are replayed in ledger order, which lets a linked main
    /// entry push out the same person elsewhere and keeps main single.
    /// Nodes that vanished or became unselectable are dropped.
    pub fn retain_present(&mut self, tree: &mut SelectionTree) {
        let previous = std::mem::take(&mut self.assignments);

        for Assignment { role, entry } in previous {
            let key = entry.key();
            let node = match tree.get(key) {
                Some(node) if validate_unit_selectable(node).is_ok() => node,
                _ => {
                    log::debug!("{} no longer selectable, dropped from {:?}", key, role);
                    self.set_bulk(role, false);
                    continue;
                }
            };

            let mut fresh = SelectionEntry::from_node(node);
            if let Some(delegated_id) = entry.delegated_id {
                match delegates_of(node).iter().find(|d| d.id == delegated_id) {
                    Some(delegate) => fresh = fresh.with_delegate(delegate),
                    None => log::debug!("Delegate {} no longer offered for {}", delegated_id, key),
                }
            }

            if let Some(by) = self.blocker(&fresh, role) {
                log::debug!("{} dropped from {:?}: {} holds the main role", key, role, by);
                self.set_bulk(role, false);
                continue;
            }
            self.commit(fresh, role);
        }

        self.sync(tree);
    }

    pub fn validate_for_submission(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.entries(Role::Main).is_empty() {
            errors.add(ValidationError::missing_main_handler());
        }
        errors.into_result()
    }

    fn sync(&self, tree: &mut SelectionTree) {
        let roles: HashMap<NodeKey, Role> = self
            .assignments
            .iter()
            .map(|a| (a.entry.key(), a.role))
            .collect();
        tree.for_each_mut(|node| node.selected = roles.get(&node.key()).copied());
    }
}

fn is_bulk_candidate(node: &TreeNode) -> bool {
    match &node.data {
        NodeData::Staff(_) => true,
        NodeData::Unit(unit) => unit.is_eligible_for_bulk(),
    }
}

fn delegates_of(node: &TreeNode) -> Vec<DelegateUser> {
    match &node.data {
        NodeData::Staff(member) => member.delegate_users.clone(),
        NodeData::Unit(unit) => unit
            .leader
            .as_ref()
            .map(|l| l.delegate_users.clone())
            .unwrap_or_default(),
    }
}
