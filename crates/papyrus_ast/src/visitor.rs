//! Generic pre-order tree walk with per-node skip-children control.

use crate::tree::SyntaxTree;
use crate::types::NodeId;

/// What the walk should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    SkipChildren,
}

/// Visit `root` and every node below it in pre-order, source order among
/// siblings. Returning [`VisitControl::SkipChildren`] from `visit` prunes
/// the subtree of the node just visited.
pub fn visit_tree<F>(tree: &SyntaxTree, root: NodeId, mut visit: F)
where
    F: FnMut(NodeId) -> VisitControl,
{
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if visit(id) == VisitControl::SkipChildren {
            continue;
        }
        let children = tree.kind(id).children();
        stack.extend(children.into_iter().rev());
    }
}
