//! The core function library.

use crate::engine::{EvaluationContext, XPathValue};
use crate::error::XPathError;
use crate::tree::TreeNode;

/// Dispatches a function call by name.
pub fn evaluate_function<'a, N: TreeNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    match name {
        // Node-set
        "position" => {
            arity(name, &args, 0, Some(0), "0")?;
            Ok(XPathValue::Number(ctx.position as f64))
        }
        "last" => {
            arity(name, &args, 0, Some(0), "0")?;
            Ok(XPathValue::Number(ctx.size as f64))
        }
        "count" => func_count(args),
        "name" | "local-name" => func_local_name(name, args, ctx),

        // String
        "string" => {
            arity(name, &args, 0, Some(1), "0 or 1")?;
            Ok(XPathValue::String(string_arg(args, ctx)))
        }
        "concat" => {
            arity(name, &args, 2, None, "2 or more")?;
            Ok(XPathValue::String(args.iter().map(|a| a.to_string()).collect()))
        }
        "contains" => {
            arity(name, &args, 2, Some(2), "2")?;
            let (haystack, needle) = (args[0].to_string(), args[1].to_string());
            Ok(XPathValue::Boolean(haystack.contains(needle.as_str())))
        }
        "starts-with" => {
            arity(name, &args, 2, Some(2), "2")?;
            let (haystack, prefix) = (args[0].to_string(), args[1].to_string());
            Ok(XPathValue::Boolean(haystack.starts_with(prefix.as_str())))
        }
        "string-length" => {
            arity(name, &args, 0, Some(1), "0 or 1")?;
            Ok(XPathValue::Number(string_arg(args, ctx).chars().count() as f64))
        }
        "normalize-space" => {
            arity(name, &args, 0, Some(1), "0 or 1")?;
            let s = string_arg(args, ctx);
            Ok(XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" ")))
        }

        // Number
        "number" => {
            arity(name, &args, 0, Some(1), "0 or 1")?;
            let n = match args.first() {
                Some(arg) => arg.to_number(),
                None => XPathValue::NodeSet(vec![ctx.node]).to_number(),
            };
            Ok(XPathValue::Number(n))
        }

        // Boolean
        "boolean" => {
            arity(name, &args, 1, Some(1), "1")?;
            Ok(XPathValue::Boolean(args[0].to_bool()))
        }
        "not" => {
            arity(name, &args, 1, Some(1), "1")?;
            Ok(XPathValue::Boolean(!args[0].to_bool()))
        }
        "true" => {
            arity(name, &args, 0, Some(0), "0")?;
            Ok(XPathValue::Boolean(true))
        }
        "false" => {
            arity(name, &args, 0, Some(0), "0")?;
            Ok(XPathValue::Boolean(false))
        }

        _ => Err(XPathError::UnknownFunction(name.to_string())),
    }
}

fn arity<N>(
    name: &str,
    args: &[XPathValue<N>],
    min: usize,
    max: Option<usize>,
    expected: &'static str,
) -> Result<(), XPathError> {
    let found = args.len();
    if found < min || max.is_some_and(|max| found > max) {
        return Err(XPathError::Arity {
            function: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

/// The single optional argument as a string, defaulting to the context node's string value.
fn string_arg<'a, N: TreeNode<'a>>(
    mut args: Vec<XPathValue<N>>,
    ctx: &EvaluationContext<N>,
) -> String {
    match args.pop() {
        Some(arg) => arg.to_string(),
        None => ctx.node.string_value(),
    }
}

fn func_count<'a, N: TreeNode<'a>>(
    mut args: Vec<XPathValue<N>>,
) -> Result<XPathValue<N>, XPathError> {
    arity("count", &args, 1, Some(1), "1")?;
    match args.remove(0) {
        XPathValue::NodeSet(nodes) => Ok(XPathValue::Number(nodes.len() as f64)),
        other => Err(XPathError::Type(format!(
            "count() requires a node-set, got {:?}",
            other
        ))),
    }
}

/// Prefixes are not modelled, so `name()` and `local-name()` agree.
fn func_local_name<'a, N: TreeNode<'a>>(
    name: &str,
    mut args: Vec<XPathValue<N>>,
    ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    arity(name, &args, 0, Some(1), "0 or 1")?;
    let node = match args.pop() {
        None => Some(ctx.node),
        Some(XPathValue::NodeSet(nodes)) => nodes.into_iter().next(),
        Some(other) => {
            return Err(XPathError::Type(format!(
                "{}() requires a node-set, got {:?}",
                name, other
            )));
        }
    };
    let local = node.and_then(|n| n.local_name()).unwrap_or_default();
    Ok(XPathValue::String(local.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CompiledXPath;
    use crate::tree::mock::library;

    fn eval_string(xpath: &str, context: usize) -> String {
        let tree = library();
        CompiledXPath::compile(xpath)
            .unwrap()
            .evaluate(tree.node(context))
            .unwrap()
            .to_string()
    }

    fn eval_err(xpath: &str) -> XPathError {
        let tree = library();
        CompiledXPath::compile(xpath)
            .unwrap()
            .evaluate(tree.node(0))
            .unwrap_err()
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(eval_string("concat(title, ' (', pages, ')')", 2), "Dune (412)");
        assert_eq!(eval_string("contains(title, 'un')", 2), "true");
        assert_eq!(eval_string("starts-with(title, 'E')", 2), "false");
        assert_eq!(eval_string("string-length(title)", 10), "4");
        assert_eq!(eval_string("normalize-space('  a \n b  ')", 0), "a b");
        assert_eq!(eval_string("string()", 5), "Dune");
        assert_eq!(eval_string("string(1 + 1)", 0), "2");
    }

    #[test]
    fn test_number_and_boolean_functions() {
        assert_eq!(eval_string("number(pages) + 1", 2), "413");
        assert_eq!(eval_string("number('12') + 1", 0), "13");
        assert_eq!(eval_string("number('abc')", 0), "NaN");
        assert_eq!(eval_string("boolean(//book)", 0), "true");
        assert_eq!(eval_string("not(//price)", 0), "true");
        assert_eq!(eval_string("true() and false()", 0), "false");
    }

    #[test]
    fn test_node_functions() {
        assert_eq!(eval_string("count(//title)", 0), "2");
        assert_eq!(eval_string("name()", 2), "book");
        assert_eq!(eval_string("local-name(@*)", 2), "id");
        assert_eq!(eval_string("local-name(//price)", 0), "");
        assert_eq!(eval_string("count(//book[position() = last()])", 0), "1");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            eval_err("unknown(1)"),
            XPathError::UnknownFunction("unknown".to_string())
        );
        assert_eq!(
            eval_err("concat('a')"),
            XPathError::Arity {
                function: "concat".to_string(),
                expected: "2 or more",
                found: 1,
            }
        );
        assert!(matches!(eval_err("count('a')"), XPathError::Type(_)));
        assert!(matches!(eval_err("not()"), XPathError::Arity { .. }));
    }
}
