//! Tree view model.
//!
//! The forest exclusively owns its nodes. Children refer back to their owning
//! unit through `parent_id` only, and `SelectionTree` keeps a key → path index
//! so neither keyed nor parent lookups need a search.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

use super::model::{DelegateUser, OrgUnit, StaffId, StaffMember, UnitId};
use crate::selection::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Unit,
    Staff,
}

/// Identity of a selectable node. Unit and staff ids live in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub id: i64,
}

impl NodeKey {
    pub const fn unit(id: UnitId) -> Self {
        Self {
            kind: NodeKind::Unit,
            id,
        }
    }

    pub const fn staff(id: StaffId) -> Self {
        Self {
            kind: NodeKind::Staff,
            id,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Unit => write!(f, "unit:{}", self.id),
            NodeKind::Staff => write!(f, "staff:{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderInfo {
    pub id: StaffId,
    pub full_name: String,
    pub position_name: Option<String>,
    #[serde(default)]
    pub delegate_users: Vec<DelegateUser>,
}

impl From<&StaffMember> for LeaderInfo {
    fn from(member: &StaffMember) -> Self {
        Self {
            id: member.id,
            full_name: member.full_name.clone(),
            position_name: member.position_name.clone(),
            delegate_users: member.delegate_users.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitNode {
    pub unit: OrgUnit,
    pub leader: Option<LeaderInfo>,
    pub is_can_check: bool,
}

impl UnitNode {
    pub fn has_leader(&self) -> bool {
        self.leader.is_some()
    }

    pub fn leader_id(&self) -> Option<StaffId> {
        self.leader.as_ref().map(|l| l.id)
    }

    /// Whether bulk selection may pick this unit up.
    pub fn is_eligible_for_bulk(&self) -> bool {
        self.has_leader() && self.is_can_check
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeData {
    Unit(UnitNode),
    Staff(StaffMember),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    #[serde(flatten)]
    pub data: NodeData,
    pub parent_id: Option<UnitId>,
    pub selected: Option<Role>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new_unit(unit: OrgUnit) -> Self {
        let is_can_check = unit.is_can_check.unwrap_or(true);
        Self {
            parent_id: unit.parent_id,
            data: NodeData::Unit(UnitNode {
                unit,
                leader: None,
                is_can_check,
            }),
            selected: None,
            children: Vec::new(),
        }
    }

    pub fn new_staff(member: StaffMember) -> Self {
        Self {
            parent_id: Some(member.org_id),
            data: NodeData::Staff(member),
            selected: None,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        match &self.data {
            NodeData::Unit(u) => NodeKey::unit(u.unit.id),
            NodeData::Staff(s) => NodeKey::staff(s.id),
        }
    }

    pub fn unit_id(&self) -> Option<UnitId> {
        self.as_unit().map(|u| u.unit.id)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.data, NodeData::Unit(_))
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.data, NodeData::Staff(_))
    }

    pub fn as_unit(&self) -> Option<&UnitNode> {
        match &self.data {
            NodeData::Unit(u) => Some(u),
            NodeData::Staff(_) => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut UnitNode> {
        match &mut self.data {
            NodeData::Unit(u) => Some(u),
            NodeData::Staff(_) => None,
        }
    }

    pub fn as_staff(&self) -> Option<&StaffMember> {
        match &self.data {
            NodeData::Staff(s) => Some(s),
            NodeData::Unit(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match &self.data {
            NodeData::Unit(u) => &u.unit.name,
            NodeData::Staff(s) => &s.full_name,
        }
    }

    pub fn selected_as_main(&self) -> bool {
        self.selected == Some(Role::Main)
    }

    pub fn selected_as_support(&self) -> bool {
        self.selected == Some(Role::Support)
    }

    pub fn selected_as_know(&self) -> bool {
        self.selected == Some(Role::Know)
    }

    pub fn has_staff_descendant(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.is_staff() || child.has_staff_descendant())
    }
}

/// Filtered, annotated forest for one transfer dialog.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTree {
    roots: Vec<TreeNode>,
    multi_target: bool,
    #[serde(skip)]
    index: HashMap<NodeKey, Vec<Vec<usize>>>,
}

impl SelectionTree {
    pub fn from_roots(roots: Vec<TreeNode>, multi_target: bool) -> Self {
        let mut tree = Self {
            roots,
            multi_target,
            index: HashMap::new(),
        };
        tree.reindex();
        tree
    }

    fn reindex(&mut self) {
        fn walk(
            nodes: &[TreeNode],
            path: &mut Vec<usize>,
            index: &mut HashMap<NodeKey, Vec<Vec<usize>>>,
        ) {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                index.entry(node.key()).or_default().push(path.clone());
                walk(&node.children, path, index);
                path.pop();
            }
        }

        let mut index = HashMap::new();
        walk(&self.roots, &mut Vec::new(), &mut index);
        self.index = index;
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn is_multi_target(&self) -> bool {
        self.multi_target
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.index.contains_key(&key)
    }

    /// First occurrence of `key` in pre-order.
    pub fn get(&self, key: NodeKey) -> Option<&TreeNode> {
        let path = self.index.get(&key)?.first()?;
        self.node_at(path)
    }

    /// The unit that owns `key`, if it is not a root.
    pub fn parent_of(&self, key: NodeKey) -> Option<&TreeNode> {
        let parent_id = self.get(key)?.parent_id?;
        self.get(NodeKey::unit(parent_id))
    }

    fn node_at(&self, path: &[usize]) -> Option<&TreeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    /// Pre-order traversal of the whole forest.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut TreeNode)) {
        fn walk<F: FnMut(&mut TreeNode)>(nodes: &mut [TreeNode], f: &mut F) {
            for node in nodes.iter_mut() {
                f(&mut *node);
                walk(&mut node.children, &mut *f);
            }
        }
        walk(&mut self.roots, &mut f);
    }

    /// Nodes paired with their depth, in display order.
    pub fn flatten(&self) -> Vec<(&TreeNode, usize)> {
        fn collect<'a>(nodes: &'a [TreeNode], depth: usize, out: &mut Vec<(&'a TreeNode, usize)>) {
            for node in nodes {
                out.push((node, depth));
                collect(&node.children, depth + 1, out);
            }
        }

        let mut result = Vec::new();
        collect(&self.roots, 0, &mut result);
        result
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
