use super::tree::{LeaderInfo, TreeNode};

/// Record the designated leader of every unit, taken from its direct staff.
///
/// The first `is_lead` member wins when data carries more than one.
pub fn resolve_leaders(nodes: &mut [TreeNode]) {
    for node in nodes.iter_mut() {
        let leader = node
            .children
            .iter()
            .filter_map(TreeNode::as_staff)
            .find(|member| member.is_lead)
            .map(LeaderInfo::from);

        if let Some(unit) = node.as_unit_mut() {
            if leader.is_none() {
                log::debug!("Unit {} ({}) has no designated leader", unit.unit.id, unit.unit.name);
            }
            unit.leader = leader;
        }

        resolve_leaders(&mut node.children);
    }
}
