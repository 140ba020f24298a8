//! Relevance pruning.

use super::tree::TreeNode;

/// Drop every unit with no staff anywhere below it.
///
/// Works bottom-up, so a unit whose only children were pruned goes too.
pub fn retain_staffed(nodes: &mut Vec<TreeNode>) {
    nodes.retain_mut(|node| {
        if node.is_staff() {
            return true;
        }
        retain_staffed(&mut node.children);
        !node.children.is_empty()
    });
}

/// Multi-target mode: only unit granularity is exposed.
///
/// Units that still had staff below them are marked checkable, then all staff
/// leaves are removed.
pub fn strip_staff(nodes: &mut Vec<TreeNode>) {
    nodes.retain(|node| node.is_unit());

    for node in nodes.iter_mut() {
        let staffed = node.has_staff_descendant();
        if let Some(unit) = node.as_unit_mut() {
            if staffed {
                unit.is_can_check = true;
            }
        }
        strip_staff(&mut node.children);
    }
}
