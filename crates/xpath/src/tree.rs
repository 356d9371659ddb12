//! The navigable tree abstraction the engine evaluates against.

use std::fmt::Debug;
use std::hash::Hash;

/// Node kinds of the XPath 1.0 data model (namespace nodes are not modelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// A cheap, copyable handle to a node of a read-only tree.
///
/// `Ord` must follow document order; the engine relies on it to sort and
/// deduplicate node-sets. `'a` is the lifetime of the underlying tree.
pub trait TreeNode<'a>: Debug + Clone + Copy + Eq + Hash + Ord {
    fn kind(&self) -> NodeKind;

    /// Local name of elements and attributes, target of processing instructions.
    fn local_name(&self) -> Option<&'a str>;

    /// The XPath string value: text content for text, comment and attribute nodes,
    /// concatenated descendant text for elements and the root.
    fn string_value(&self) -> String;

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn parent(&self) -> Option<Self>;

    /// Walks up to the root of the tree.
    fn root(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }
}
