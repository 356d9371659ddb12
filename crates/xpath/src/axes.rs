//! Collects the nodes reachable from one context node along an axis.
//!
//! Nodes are returned in proximity order: document order for forward axes,
//! reverse document order for reverse axes. Positional predicates are applied to
//! this order before the step result is re-sorted into document order.

use crate::ast::Axis;
use crate::tree::{NodeKind, TreeNode};

pub fn collect<'a, N: TreeNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    let mut out = Vec::new();
    match axis {
        Axis::Child => out.extend(node.children()),
        Axis::Attribute => out.extend(node.attributes()),
        Axis::SelfAxis => out.push(node),
        Axis::Parent => out.extend(node.parent()),
        Axis::Descendant => push_descendants(node, &mut out),
        Axis::DescendantOrSelf => {
            out.push(node);
            push_descendants(node, &mut out);
        }
        Axis::Ancestor => push_ancestors(node, &mut out),
        Axis::AncestorOrSelf => {
            out.push(node);
            push_ancestors(node, &mut out);
        }
        Axis::FollowingSibling => {
            if let Some(parent) = sibling_parent(node) {
                out.extend(parent.children().skip_while(|s| *s != node).skip(1));
            }
        }
        Axis::PrecedingSibling => {
            if let Some(parent) = sibling_parent(node) {
                out.extend(parent.children().take_while(|s| *s != node));
                out.reverse();
            }
        }
    }
    out
}

/// Depth-first, pre-order: the document order of a subtree.
fn push_descendants<'a, N: TreeNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        out.push(current);
        let start = stack.len();
        stack.extend(current.children());
        stack[start..].reverse();
    }
}

fn push_ancestors<'a, N: TreeNode<'a>>(node: N, out: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(parent) = current {
        out.push(parent);
        current = parent.parent();
    }
}

/// Attributes have a parent but are not among its children, so they have no siblings.
fn sibling_parent<'a, N: TreeNode<'a>>(node: N) -> Option<N> {
    if node.kind() == NodeKind::Attribute {
        return None;
    }
    node.parent()
}
