//! Attaches staff members to their owning units.

use super::model::{StaffMember, UnitId};
use super::tree::{NodeKey, TreeNode};

/// Insert every staff member as a leaf under the unit referenced by `org_id`.
///
/// Members are prepended in reverse input order so the final child order
/// matches the input, with staff ahead of sub-units. Attaching a member that
/// is already present under its unit is a no-op. Members of unknown units are
/// dropped. Returns how many nodes were attached.
pub fn attach_staff(roots: &mut [TreeNode], staff: &[StaffMember]) -> usize {
    let mut attached = 0;

    for member in staff.iter().rev() {
        let Some(unit) = find_unit_mut(roots, member.org_id) else {
            log::warn!(
                "Staff {} ({}) references unknown unit {}, skipping",
                member.id,
                member.full_name,
                member.org_id
            );
            continue;
        };

        let key = NodeKey::staff(member.id);
        if unit.children.iter().any(|child| child.key() == key) {
            log::debug!("Staff {} already attached to unit {}", member.id, member.org_id);
            continue;
        }

        unit.children.insert(0, TreeNode::new_staff(member.clone()));
        attached += 1;
    }

    attached
}

pub(crate) fn find_unit_mut(nodes: &mut [TreeNode], id: UnitId) -> Option<&mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.unit_id() == Some(id) {
            return Some(node);
        }
        if let Some(found) = find_unit_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}
