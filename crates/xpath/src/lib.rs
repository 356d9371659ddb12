//! An XPath 1.0 subset for selecting nodes out of a read-only tree.
//!
//! The engine works against any type implementing [`TreeNode`], so the same
//! compiled expression can run over a parsed XML document or an in-memory test
//! tree.

pub mod ast;
pub mod axes;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod parser;
pub mod tree;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, Step};
pub use engine::{CompiledXPath, EvaluationContext, XPathValue, evaluate, select, select_first};
pub use error::XPathError;
pub use parser::parse_expression;
pub use tree::{NodeKind, TreeNode};
