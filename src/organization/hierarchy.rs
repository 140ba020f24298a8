//! Builds the unit forest from the flat unit list.

use std::collections::HashSet;

use super::model::{OrgUnit, UnitId};
use super::tree::TreeNode;

/// Turn a flat unit list into a rooted forest.
///
/// Units without a parent, or whose parent is not in the list, become roots.
/// Attached units leave the pool before their own children are looked up, so
/// an id is placed at most once and recursion depth is bounded by the pool.
/// Whatever is still in the pool at the end is unreachable from any root
/// (parent cycles and their descendants) and is dropped.
pub fn build_hierarchy(units: &[OrgUnit]) -> Vec<TreeNode> {
    let known: HashSet<UnitId> = units.iter().map(|u| u.id).collect();

    let (root_units, mut pool): (Vec<&OrgUnit>, Vec<&OrgUnit>) = units
        .iter()
        .partition(|u| u.is_root() || u.parent_id.map_or(false, |p| !known.contains(&p)));

    let mut placed = HashSet::new();
    let mut roots = Vec::with_capacity(root_units.len());

    for unit in root_units {
        if !placed.insert(unit.id) {
            log::warn!("Duplicate unit id {} dropped from hierarchy", unit.id);
            continue;
        }
        if let Some(parent) = unit.parent_id {
            log::warn!(
                "Unit {} references unknown parent {}, treating it as a root",
                unit.id,
                parent
            );
        }
        let mut node = TreeNode::new_unit(unit.clone());
        node.parent_id = None;
        attach_children(&mut node, &mut pool, &mut placed);
        roots.push(node);
    }

    if !pool.is_empty() {
        let dropped: Vec<UnitId> = pool.iter().map(|u| u.id).collect();
        log::warn!(
            "Dropped {} unit(s) unreachable from any root (parent cycle or duplicate id): {:?}",
            dropped.len(),
            dropped
        );
    }

    roots
}

fn attach_children(node: &mut TreeNode, pool: &mut Vec<&OrgUnit>, placed: &mut HashSet<UnitId>) {
    let Some(id) = node.unit_id() else {
        return;
    };

    let (children, rest): (Vec<&OrgUnit>, Vec<&OrgUnit>) =
        pool.drain(..).partition(|u| u.parent_id == Some(id));
    *pool = rest;

    for unit in children {
        if !placed.insert(unit.id) {
            log::warn!("Duplicate unit id {} under unit {} dropped", unit.id, id);
            continue;
        }
        let mut child = TreeNode::new_unit(unit.clone());
        attach_children(&mut child, pool, placed);
        node.children.push(child);
    }
}
