//! Evaluates a parsed expression against any `TreeNode` implementation.

use crate::ast::{Axis, Expression, LocationPath, NodeTest, Step};
use crate::error::XPathError;
use crate::parser::parse_expression;
use crate::tree::{NodeKind, TreeNode};
use crate::{axes, functions, operators};
use std::fmt;

/// The four XPath 1.0 value types.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: TreeNode<'a>> XPathValue<N> {
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::String(s) => string_to_number(s),
            XPathValue::NodeSet(nodes) => nodes
                .first()
                .map(|n| string_to_number(&n.string_value()))
                .unwrap_or(f64::NAN),
        }
    }
}

/// XPath `number()` on a string: surrounding whitespace allowed, no exponent, no `inf`.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
        && digits != ".";
    if !well_formed {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// XPath `string()` on a number.
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl<'a, N: TreeNode<'a>> fmt::Display for XPathValue<N> {
    /// The XPath string conversion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => write!(
                f,
                "{}",
                nodes.first().map(|n| n.string_value()).unwrap_or_default()
            ),
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The focus of an evaluation: context node, its position and size, and the document root.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<N> {
    pub node: N,
    pub root: N,
    /// 1-based.
    pub position: usize,
    pub size: usize,
}

impl<'a, N: TreeNode<'a>> EvaluationContext<N> {
    pub fn new(node: N, root: N) -> Self {
        Self {
            node,
            root,
            position: 1,
            size: 1,
        }
    }

    /// A context rooted at the top of `node`'s own tree.
    pub fn for_node(node: N) -> Self {
        Self::new(node, node.root())
    }

    fn focus(&self, node: N, position: usize, size: usize) -> Self {
        Self {
            node,
            root: self.root,
            position,
            size,
        }
    }
}

pub fn evaluate<'a, N: TreeNode<'a>>(
    expr: &Expression,
    ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::Path(path) => Ok(XPathValue::NodeSet(evaluate_location_path(path, ctx)?)),
        Expression::FunctionCall { name, args } => {
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(evaluate(arg, ctx)?);
            }
            functions::evaluate_function(name, evaluated, ctx)
        }
        Expression::Binary { left, op, right } => {
            let left = evaluate(left, ctx)?;
            if let Some(decided) = operators::short_circuit(*op, &left) {
                return Ok(XPathValue::Boolean(decided));
            }
            let right = evaluate(right, ctx)?;
            operators::evaluate(*op, left, right)
        }
        Expression::Negate(inner) => Ok(XPathValue::Number(-evaluate(inner, ctx)?.to_number())),
    }
}

/// Evaluates `expr` and requires a node-set, returned in document order.
pub fn select<'a, N: TreeNode<'a>>(
    expr: &Expression,
    context: N,
    root: N,
) -> Result<Vec<N>, XPathError> {
    match evaluate(expr, &EvaluationContext::new(context, root))? {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        other => Err(XPathError::Type(format!(
            "expression does not select nodes, it evaluates to '{}'",
            other
        ))),
    }
}

pub fn select_first<'a, N: TreeNode<'a>>(
    expr: &Expression,
    context: N,
    root: N,
) -> Result<Option<N>, XPathError> {
    Ok(select(expr, context, root)?.into_iter().next())
}

fn evaluate_location_path<'a, N: TreeNode<'a>>(
    path: &LocationPath,
    ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    let mut current = if path.absolute {
        vec![ctx.root]
    } else {
        vec![ctx.node]
    };
    for step in &path.steps {
        current = evaluate_step(step, &current, ctx)?;
    }
    Ok(current)
}

/// Predicates see each context node's candidates in proximity order; the
/// merged result is put back into document order.
fn evaluate_step<'a, N: TreeNode<'a>>(
    step: &Step,
    context_nodes: &[N],
    ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    let mut result = Vec::new();
    for &node in context_nodes {
        let candidates: Vec<N> = axes::collect(step.axis, node)
            .into_iter()
            .filter(|candidate| matches_test(*candidate, &step.test, step.axis))
            .collect();
        result.extend(apply_predicates(candidates, &step.predicates, ctx)?);
    }
    result.sort();
    result.dedup();
    Ok(result)
}

fn matches_test<'a, N: TreeNode<'a>>(node: N, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeKind::Attribute
    } else {
        NodeKind::Element
    };
    match test {
        NodeTest::Wildcard => node.kind() == principal,
        NodeTest::Name(name) => {
            node.kind() == principal && node.local_name() == Some(name.as_str())
        }
        NodeTest::Text => node.kind() == NodeKind::Text,
        NodeTest::Comment => node.kind() == NodeKind::Comment,
        NodeTest::AnyNode => true,
    }
}

fn apply_predicates<'a, N: TreeNode<'a>>(
    mut nodes: Vec<N>,
    predicates: &[Expression],
    ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError> {
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            let position = i + 1;
            let keep = match evaluate(predicate, &ctx.focus(node, position, size))? {
                XPathValue::Number(n) => n == position as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

/// An expression parsed once and evaluated many times.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledXPath {
    source: String,
    expr: Expression,
}

impl CompiledXPath {
    pub fn compile(source: &str) -> Result<Self, XPathError> {
        let expr = parse_expression(source)?;
        log::trace!("Compiled XPath '{}': {:?}", source, expr);
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    pub fn evaluate<'a, N: TreeNode<'a>>(&self, context: N) -> Result<XPathValue<N>, XPathError> {
        evaluate(&self.expr, &EvaluationContext::for_node(context))
    }

    pub fn select<'a, N: TreeNode<'a>>(&self, context: N) -> Result<Vec<N>, XPathError> {
        select(&self.expr, context, context.root())
    }

    pub fn select_first<'a, N: TreeNode<'a>>(&self, context: N) -> Result<Option<N>, XPathError> {
        select_first(&self.expr, context, context.root())
    }
}

impl fmt::Display for CompiledXPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::mock::{MockNode, library};

    fn ids(nodes: &[MockNode<'_>]) -> Vec<usize> {
        nodes.iter().map(|n| n.id).collect()
    }

    fn run<'a>(xpath: &str, context: MockNode<'a>) -> XPathValue<MockNode<'a>> {
        CompiledXPath::compile(xpath)
            .unwrap()
            .evaluate(context)
            .unwrap()
    }

    fn nodes<'a>(xpath: &str, context: MockNode<'a>) -> Vec<usize> {
        ids(&CompiledXPath::compile(xpath).unwrap().select(context).unwrap())
    }

    #[test]
    fn test_relative_and_absolute_paths() {
        let tree = library();
        let book = tree.node(2);
        assert_eq!(nodes("./title", book), vec![5]);
        assert_eq!(nodes("./@id", book), vec![3]);
        assert_eq!(nodes("/library/book", book), vec![2, 10]);
        assert_eq!(nodes("/", book), vec![0]);
        assert_eq!(nodes(".", book), vec![2]);
        assert_eq!(nodes("..", book), vec![1]);
    }

    #[test]
    fn test_descendant_paths_are_document_ordered_and_unique() {
        let tree = library();
        let root = tree.node(0);
        assert_eq!(nodes("//title", root), vec![5, 12]);
        assert_eq!(nodes("//book//text()", root), vec![6, 8, 13, 15]);
        assert_eq!(nodes("//title | //book", root), vec![2, 5, 10, 12]);
        assert_eq!(nodes("//title/../title", root), vec![5, 12]);
    }

    #[test]
    fn test_wildcards_and_node_type_tests() {
        let tree = library();
        assert_eq!(nodes("*", tree.node(1)), vec![2, 10]);
        assert_eq!(nodes("node()", tree.node(1)), vec![2, 9, 10]);
        assert_eq!(nodes("comment()", tree.node(1)), vec![9]);
        assert_eq!(nodes("@*", tree.node(2)), vec![3, 4]);
    }

    #[test]
    fn test_positional_predicates() {
        let tree = library();
        let root = tree.node(0);
        assert_eq!(nodes("/library/book[2]", root), vec![10]);
        assert_eq!(nodes("/library/book[last()]", root), vec![10]);
        assert_eq!(nodes("//book/*[1]", root), vec![5, 12]);
        assert_eq!(nodes("//title/ancestor::*[1]", root), vec![2, 10]);
    }

    #[test]
    fn test_boolean_predicates() {
        let tree = library();
        let root = tree.node(0);
        assert_eq!(nodes("//book[@id = 'b2']", root), vec![10]);
        assert_eq!(nodes("//book[@lang]", root), vec![2]);
        assert_eq!(nodes("//book[pages > 450]/title", root), vec![12]);
        assert_eq!(nodes("//book[not(@lang) and title = 'Emma']", root), vec![10]);
        assert!(nodes("//book[title = 'Missing']", root).is_empty());
    }

    #[test]
    fn test_scalar_results() {
        let tree = library();
        let root = tree.node(0);
        assert_eq!(run("count(//book)", root), XPathValue::Number(2.0));
        assert_eq!(run("//pages + 1", root), XPathValue::Number(413.0));
        assert_eq!(run("-(2)", root).to_string(), "-2");
        assert_eq!(run("1 = 1 or 1 = 2", root), XPathValue::Boolean(true));
        assert_eq!(run("string(//book/@id)", root).to_string(), "b1");
    }

    #[test]
    fn test_and_or_skip_the_right_operand() {
        let tree = library();
        let root = tree.node(0);
        assert_eq!(run("false() and missing()", root), XPathValue::Boolean(false));
        assert_eq!(run("//book or missing()", root), XPathValue::Boolean(true));
        assert_eq!(run("//book and //title", root), XPathValue::Boolean(true));
        assert_eq!(run("//price or 0", root), XPathValue::Boolean(false));

        let xpath = CompiledXPath::compile("true() and missing()").unwrap();
        assert!(matches!(
            xpath.evaluate(root),
            Err(XPathError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_select_rejects_non_node_sets() {
        let tree = library();
        let xpath = CompiledXPath::compile("count(//book)").unwrap();
        assert!(matches!(xpath.select(tree.node(0)), Err(XPathError::Type(_))));
    }

    #[test]
    fn test_select_first() {
        let tree = library();
        let xpath = CompiledXPath::compile("//pages").unwrap();
        assert_eq!(xpath.select_first(tree.node(0)).unwrap().map(|n| n.id), Some(7));
        let missing = CompiledXPath::compile("//price").unwrap();
        assert_eq!(missing.select_first(tree.node(0)).unwrap(), None);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number_to_string(3.0), "3");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.25), "0.25");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number("-1.5"), -1.5);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("1e3").is_nan());
        assert!(string_to_number("").is_nan());
    }
}
