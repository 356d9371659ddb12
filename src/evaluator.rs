// src/evaluator.rs
//! Evaluates one node definition against a set of context nodes.

use crate::document::XmlNode;
use crate::error::{Error, Result};
use crate::native_type::{Converter, Defaults};
use crate::node_xpath::NodeXPath;
use crate::options::NodeOptions;
use crate::value::Value;
use xmlbind_xpath::{CompiledXPath, XPathError};

/// The compiled XPaths of a node: where its values are, and the optional
/// local context they are looked up from.
#[derive(Debug, Clone)]
pub struct NodeEvaluator {
    xpath: CompiledXPath,
    local_context: Option<CompiledXPath>,
    array: bool,
}

impl NodeEvaluator {
    pub fn new(xpath: CompiledXPath, local_context: Option<CompiledXPath>, array: bool) -> Self {
        Self {
            xpath,
            local_context,
            array,
        }
    }

    /// Derives and compiles the XPaths for the node called `name`.
    pub fn compile(name: &str, options: &NodeOptions) -> Result<Self> {
        let invalid = |source: XPathError| Error::InvalidXPath {
            node: name.to_string(),
            source,
        };
        let xpath =
            CompiledXPath::compile(&NodeXPath::new(name, options).xpath()).map_err(invalid)?;
        let local_context = options
            .local_context
            .as_deref()
            .map(CompiledXPath::compile)
            .transpose()
            .map_err(invalid)?;
        Ok(Self::new(xpath, local_context, options.array))
    }

    pub fn xpath(&self) -> &CompiledXPath {
        &self.xpath
    }

    pub fn is_array(&self) -> bool {
        self.array
    }

    /// All nodes the XPath reaches from any context node, in document order.
    /// With a local context, the XPath is evaluated from every node it matches.
    pub fn select<'a>(&self, context: &[XmlNode<'a>]) -> Result<Vec<XmlNode<'a>>> {
        let scoped;
        let context = match &self.local_context {
            Some(local) => {
                scoped = select_all(local, context)?;
                scoped.as_slice()
            }
            None => context,
        };
        select_all(&self.xpath, context)
    }

    /// The converted value of the first match, or a list of all matches for arrays.
    pub fn evaluate(
        &self,
        context: &[XmlNode<'_>],
        converter: &Converter,
        defaults: &Defaults,
    ) -> Result<Value> {
        let matches = self.select(context)?;
        log::trace!("XPath '{}' matched {} node(s)", self.xpath, matches.len());
        if self.array {
            let values = matches
                .into_iter()
                .map(|node| converter.evaluate(Some(node), defaults))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(values))
        } else {
            converter.evaluate(matches.first().copied(), defaults)
        }
    }
}

fn select_all<'a>(xpath: &CompiledXPath, context: &[XmlNode<'a>]) -> Result<Vec<XmlNode<'a>>> {
    let mut nodes = Vec::new();
    for &node in context {
        nodes.extend(xpath.select(node)?);
    }
    if context.len() > 1 {
        nodes.sort();
        nodes.dedup();
    }
    Ok(nodes)
}
