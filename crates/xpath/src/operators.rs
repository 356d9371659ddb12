//! Comparison, arithmetic and union with XPath 1.0 node-set semantics.

use crate::ast::BinaryOperator;
use crate::engine::XPathValue;
use crate::error::XPathError;
use crate::tree::TreeNode;

/// The result of `and`/`or` when the left operand alone decides it.
pub fn short_circuit<'a, N: TreeNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
) -> Option<bool> {
    match op {
        BinaryOperator::And if !left.to_bool() => Some(false),
        BinaryOperator::Or if left.to_bool() => Some(true),
        _ => None,
    }
}

pub fn evaluate<'a, N: TreeNode<'a>>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    let value = match op {
        BinaryOperator::Or => XPathValue::Boolean(left.to_bool() || right.to_bool()),
        BinaryOperator::And => XPathValue::Boolean(left.to_bool() && right.to_bool()),
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::Less
        | BinaryOperator::LessOrEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterOrEqual => XPathValue::Boolean(compare(op, &left, &right)),
        BinaryOperator::Add => XPathValue::Number(left.to_number() + right.to_number()),
        BinaryOperator::Subtract => XPathValue::Number(left.to_number() - right.to_number()),
        BinaryOperator::Union => union(left, right)?,
    };
    Ok(value)
}

fn union<'a, N: TreeNode<'a>>(
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    match (left, right) {
        (XPathValue::NodeSet(mut nodes), XPathValue::NodeSet(other)) => {
            nodes.extend(other);
            nodes.sort();
            nodes.dedup();
            Ok(XPathValue::NodeSet(nodes))
        }
        (left, right) => Err(XPathError::Type(format!(
            "'|' requires node-sets on both sides, got '{}' and '{}'",
            left, right
        ))),
    }
}

/// A comparison involving a node-set holds if it holds for at least one of its nodes.
fn compare<'a, N: TreeNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let right_strings: Vec<XPathValue<N>> = r
                .iter()
                .map(|n| XPathValue::String(n.string_value()))
                .collect();
            l.iter().any(|n| {
                let left_string = XPathValue::String(n.string_value());
                right_strings
                    .iter()
                    .any(|right_string| compare_atomic(op, &left_string, right_string))
            })
        }
        (XPathValue::NodeSet(nodes), XPathValue::Boolean(_)) => {
            compare_atomic(op, &XPathValue::Boolean(!nodes.is_empty()), right)
        }
        (XPathValue::Boolean(_), XPathValue::NodeSet(nodes)) => {
            compare_atomic(op, left, &XPathValue::Boolean(!nodes.is_empty()))
        }
        (XPathValue::NodeSet(nodes), other) => nodes
            .iter()
            .any(|n| compare_atomic(op, &XPathValue::String(n.string_value()), other)),
        (other, XPathValue::NodeSet(nodes)) => nodes
            .iter()
            .any(|n| compare_atomic(op, other, &XPathValue::String(n.string_value()))),
        _ => compare_atomic(op, left, right),
    }
}

/// Equality prefers boolean, then number, then string; ordering is always numeric.
fn compare_atomic<'a, N: TreeNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    let is_boolean = |v: &XPathValue<N>| matches!(v, XPathValue::Boolean(_));
    let is_number = |v: &XPathValue<N>| matches!(v, XPathValue::Number(_));

    let equal = || {
        if is_boolean(left) || is_boolean(right) {
            left.to_bool() == right.to_bool()
        } else if is_number(left) || is_number(right) {
            left.to_number() == right.to_number()
        } else {
            left.to_string() == right.to_string()
        }
    };

    match op {
        BinaryOperator::Equals => equal(),
        BinaryOperator::NotEquals => !equal(),
        BinaryOperator::Less => left.to_number() < right.to_number(),
        BinaryOperator::LessOrEqual => left.to_number() <= right.to_number(),
        BinaryOperator::Greater => left.to_number() > right.to_number(),
        BinaryOperator::GreaterOrEqual => left.to_number() >= right.to_number(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::mock::{MockNode, library};

    type Value<'a> = XPathValue<MockNode<'a>>;

    fn num<'a>(n: f64) -> Value<'a> {
        XPathValue::Number(n)
    }

    fn string<'a>(s: &str) -> Value<'a> {
        XPathValue::String(s.to_string())
    }

    fn eval<'a>(op: BinaryOperator, left: Value<'a>, right: Value<'a>) -> Value<'a> {
        evaluate(op, left, right).unwrap()
    }

    #[test]
    fn test_atomic_equality_conversions() {
        assert_eq!(eval(BinaryOperator::Equals, num(1.0), string("1")), XPathValue::Boolean(true));
        assert_eq!(
            eval(BinaryOperator::Equals, string("a"), XPathValue::Boolean(true)),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            eval(BinaryOperator::NotEquals, num(f64::NAN), num(f64::NAN)),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            eval(BinaryOperator::Equals, string("a"), string("b")),
            XPathValue::Boolean(false)
        );
    }

    #[test]
    fn test_node_set_comparisons_are_existential() {
        let tree = library();
        let titles = XPathValue::NodeSet(vec![tree.node(5), tree.node(12)]);
        let pages = XPathValue::NodeSet(vec![tree.node(7), tree.node(14)]);

        assert_eq!(
            eval(BinaryOperator::Equals, titles.clone(), string("Emma")),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            eval(BinaryOperator::NotEquals, titles.clone(), string("Emma")),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            eval(BinaryOperator::Less, pages.clone(), num(420.0)),
            XPathValue::Boolean(true)
        );
        assert_eq!(
            eval(BinaryOperator::Greater, num(400.0), pages.clone()),
            XPathValue::Boolean(false)
        );
        assert_eq!(eval(BinaryOperator::Equals, titles, pages), XPathValue::Boolean(false));

        let empty: Value<'_> = XPathValue::NodeSet(Vec::new());
        assert_eq!(
            eval(BinaryOperator::Equals, empty.clone(), string("")),
            XPathValue::Boolean(false)
        );
        assert_eq!(
            eval(BinaryOperator::Equals, empty, XPathValue::Boolean(false)),
            XPathValue::Boolean(true)
        );
    }

    #[test]
    fn test_boolean_operators() {
        let yes: Value<'_> = XPathValue::Boolean(true);
        let no: Value<'_> = XPathValue::Boolean(false);
        assert_eq!(short_circuit(BinaryOperator::And, &no), Some(false));
        assert_eq!(short_circuit(BinaryOperator::Or, &string("x")), Some(true));
        assert_eq!(short_circuit(BinaryOperator::And, &yes), None);
        assert_eq!(short_circuit(BinaryOperator::Or, &num(0.0)), None);
        assert_eq!(short_circuit(BinaryOperator::Add, &no), None);

        assert_eq!(eval(BinaryOperator::And, yes.clone(), string("")), no);
        assert_eq!(eval(BinaryOperator::And, num(2.0), string("a")), yes);
        assert_eq!(eval(BinaryOperator::Or, no.clone(), num(1.0)), yes);
        assert_eq!(eval(BinaryOperator::Or, string(""), num(f64::NAN)), no);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval(BinaryOperator::Add, num(1.5), string("2")), num(3.5));
        assert_eq!(eval(BinaryOperator::Subtract, num(1.0), XPathValue::Boolean(true)), num(0.0));
        assert!(eval(BinaryOperator::Add, num(1.0), string("x")).to_number().is_nan());
    }

    #[test]
    fn test_union_sorts_and_deduplicates() {
        let tree = library();
        let left = XPathValue::NodeSet(vec![tree.node(12), tree.node(5)]);
        let right = XPathValue::NodeSet(vec![tree.node(5), tree.node(2)]);
        match eval(BinaryOperator::Union, left, right) {
            XPathValue::NodeSet(nodes) => {
                assert_eq!(nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 5, 12])
            }
            other => panic!("Expected a node-set, got {:?}", other),
        }
        assert!(matches!(
            evaluate(BinaryOperator::Union, num(1.0), string("a")),
            Err(XPathError::Type(_))
        ));
    }
}
