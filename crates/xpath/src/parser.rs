//! A `nom`-based parser for the supported XPath subset.
//!
//! Precedence, loosest first: `or`, `and`, equality, relational, additive,
//! unary minus, union, then paths and primary expressions.

use crate::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, Step};
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{map, map_res, not, opt, peek, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(XPathError::Parse {
            expression: input.to_string(),
            message: format!("unexpected trailing input '{}'", rest),
        }),
        Err(e) => Err(XPathError::Parse {
            expression: input.to_string(),
            message: e.to_string(),
        }),
    }
}

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parses `operand (op operand)*` into a left-associated tree.
fn left_assoc<'a>(
    input: &'a str,
    operand: fn(&'a str) -> IResult<&'a str, Expression>,
    operator: fn(&'a str) -> IResult<&'a str, BinaryOperator>,
) -> IResult<&'a str, Expression> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    let expr = rest.into_iter().fold(first, |left, (op, right)| Expression::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    });
    Ok((input, expr))
}

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

/// A keyword operator must not run into a following name character (`order` is a name).
fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(peek(take_while1(is_name_char))))
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, and_expr, |i| value(BinaryOperator::Or, keyword("or")).parse(i))
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, equality_expr, |i| {
        value(BinaryOperator::And, keyword("and")).parse(i)
    })
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, relational_expr, |i| {
        alt((
            value(BinaryOperator::NotEquals, tag("!=")),
            value(BinaryOperator::Equals, tag("=")),
        ))
        .parse(i)
    })
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, additive_expr, |i| {
        alt((
            value(BinaryOperator::LessOrEqual, tag("<=")),
            value(BinaryOperator::GreaterOrEqual, tag(">=")),
            value(BinaryOperator::Less, tag("<")),
            value(BinaryOperator::Greater, tag(">")),
        ))
        .parse(i)
    })
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, unary_expr, |i| {
        alt((
            value(BinaryOperator::Add, char('+')),
            value(BinaryOperator::Subtract, char('-')),
        ))
        .parse(i)
    })
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |e| {
            Expression::Negate(Box::new(e))
        }),
        union_expr,
    ))
    .parse(input)
}

fn union_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(input, path_expr, |i| {
        value(BinaryOperator::Union, char('|')).parse(i)
    })
}

fn path_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((primary_expr, map(location_path, Expression::Path)))).parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(number, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    ))
    .parse(input)
}

/// `12`, `12.5`, `.5`. Hand-rolled so that names like `info` are never read as `inf`.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        |text: &str| text.parse::<f64>(),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        str::to_string,
    )
    .parse(input)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn nc_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char))).parse(input)
}

/// `prefix:local` or `local`; only the local part is kept.
fn local_name(input: &str) -> IResult<&str, &str> {
    let (rest, first) = nc_name(input)?;
    match preceded(char(':'), nc_name).parse(rest) {
        Ok((rest, local)) => Ok((rest, local)),
        Err(_) => Ok((rest, first)),
    }
}

const NODE_TYPE_NAMES: [&str; 3] = ["text", "comment", "node"];

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (i, name) = recognize(pair(nc_name, opt(pair(char(':'), nc_name)))).parse(input)?;
    let (i, _) = peek(ws(char('('))).parse(i)?;
    if NODE_TYPE_NAMES.contains(&name) {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let (i, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;
    Ok((
        i,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Wildcard, char('*')),
        value(NodeTest::Text, pair(tag("text"), ws(tag("()")))),
        value(NodeTest::Comment, pair(tag("comment"), ws(tag("()")))),
        value(NodeTest::AnyNode, pair(tag("node"), ws(tag("()")))),
        map(local_name, |name| NodeTest::Name(name.to_string())),
    ))
    .parse(input)
}

fn axis(input: &str) -> IResult<&str, Axis> {
    terminated(
        alt((
            value(Axis::AncestorOrSelf, tag("ancestor-or-self")),
            value(Axis::Ancestor, tag("ancestor")),
            value(Axis::Attribute, tag("attribute")),
            value(Axis::Child, tag("child")),
            value(Axis::DescendantOrSelf, tag("descendant-or-self")),
            value(Axis::Descendant, tag("descendant")),
            value(Axis::FollowingSibling, tag("following-sibling")),
            value(Axis::Parent, tag("parent")),
            value(Axis::PrecedingSibling, tag("preceding-sibling")),
            value(Axis::SelfAxis, tag("self")),
        )),
        tag("::"),
    )
    .parse(input)
}

fn predicate(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        value(Step::new(Axis::Parent, NodeTest::AnyNode), tag("..")),
        value(Step::new(Axis::SelfAxis, NodeTest::AnyNode), char('.')),
        map(
            pair(
                alt((
                    map(preceded(char('@'), node_test), |test| (Axis::Attribute, test)),
                    pair(axis, node_test),
                    map(node_test, |test| (Axis::Child, test)),
                )),
                many0(predicate),
            ),
            |((axis, test), predicates)| Step {
                axis,
                test,
                predicates,
            },
        ),
    ))
    .parse(input)
}

fn descendant_or_self() -> Step {
    Step::new(Axis::DescendantOrSelf, NodeTest::AnyNode)
}

fn location_path(input: &str) -> IResult<&str, LocationPath> {
    let double_slash = tag::<_, _, nom::error::Error<&str>>("//").parse(input);
    let (i, (absolute, mut steps)) = if let Ok((i, _)) = double_slash {
        let (i, first) = step(i)?;
        (i, (true, vec![descendant_or_self(), first]))
    } else if let Ok((i, _)) = char::<_, nom::error::Error<&str>>('/').parse(input) {
        match step(i) {
            Ok((i, first)) => (i, (true, vec![first])),
            Err(_) => (i, (true, Vec::new())),
        }
    } else {
        let (i, first) = step(input)?;
        (i, (false, vec![first]))
    };

    let (i, rest) = many0(pair(alt((tag("//"), tag("/"))), step)).parse(i)?;
    for (separator, next) in rest {
        if separator == "//" {
            steps.push(descendant_or_self());
        }
        steps.push(next);
    }

    Ok((i, LocationPath { absolute, steps }))
}
