//! Organization tree assembly.
//!
//! - `hierarchy` - flat unit list to forest
//! - `staff` - staff leaves under their units
//! - `filter` - pruning to staffed branches, multi-target stripping
//! - `leader` - leader annotation per unit
//! - `tree` - the view model handed to the selection engine

pub mod filter;
pub mod hierarchy;
pub mod leader;
pub mod model;
pub mod staff;
pub mod tree;


pub use model::{DelegateUser, OrgUnit, StaffId, StaffMember, UnitId};
pub use tree::{LeaderInfo, NodeData, NodeKey, NodeKind, SelectionTree, TreeNode, UnitNode};

use crate::config::TransferConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Expose unit granularity only.
    pub multi_target: bool,
}

impl From<&TransferConfig> for BuildOptions {
    fn from(config: &TransferConfig) -> Self {
        Self {
            multi_target: config.multi_target,
        }
    }
}

/// Assemble the filtered, leader-annotated tree for one transfer.
///
/// `staff` must already be narrowed to the candidates for this transfer.
pub fn build_selection_tree(
    units: &[OrgUnit],
    staff: &[StaffMember],
    options: BuildOptions,
) -> SelectionTree {
    let mut roots = hierarchy::build_hierarchy(units);
    let attached = staff::attach_staff(&mut roots, staff);
    filter::retain_staffed(&mut roots);
    leader::resolve_leaders(&mut roots);
    if options.multi_target {
        filter::strip_staff(&mut roots);
    }

    let tree = SelectionTree::from_roots(roots, options.multi_target);
    log::info!(
        "Selection tree built: {} units in, {} staff attached, {} nodes retained (multi_target={})",
        units.len(),
        attached,
        tree.len(),
        options.multi_target
    );
    tree
}
