// src/schema.rs
//! Declarative schemas binding XML documents to records.

use crate::document::{XmlDocument, XmlNode};
use crate::error::{Error, Result};
use crate::evaluator::NodeEvaluator;
use crate::native_type::{Converter, Defaults, NativeType};
use crate::options::{NodeOptions, Transform};
use crate::value::{Record, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use xmlbind_xpath::{CompiledXPath, XPathError};

/// What transforms and method nodes can see while a record is being evaluated:
/// every node evaluated so far (private ones included) and the enclosing scope
/// of the parent schema, if any.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'r> {
    record: &'r Record,
    parent: Option<&'r Scope<'r>>,
}

impl<'r> Scope<'r> {
    pub fn new(record: &'r Record, parent: Option<&'r Scope<'r>>) -> Self {
        Self { record, parent }
    }

    pub fn record(&self) -> &'r Record {
        self.record
    }

    pub fn get(&self, name: &str) -> Option<&'r Value> {
        self.record.get(name)
    }

    pub fn parent(&self) -> Option<&'r Scope<'r>> {
        self.parent
    }
}

/// Computes a node's value from the finished record.
#[derive(Clone)]
pub struct Method(Arc<dyn Fn(&Scope<'_>) -> Value + Send + Sync>);

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

#[derive(Debug, Clone)]
enum Binding {
    Typed {
        evaluator: NodeEvaluator,
        converter: Converter,
        defaults: Defaults,
    },
    Child {
        evaluator: NodeEvaluator,
        schema: Schema,
    },
    Constant(Value),
    Method(Method),
}

#[derive(Debug, Clone)]
struct BoundNode {
    name: String,
    binding: Binding,
    private: bool,
    transform: Option<Transform>,
}

/// An immutable set of node definitions, built with [`SchemaBuilder`].
#[derive(Debug, Clone)]
pub struct Schema {
    context: Option<CompiledXPath>,
    nodes: Vec<BoundNode>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Names of the nodes that appear in evaluated records, in declaration order.
    pub fn public_nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|node| !node.private)
            .map(|node| node.name.as_str())
    }

    /// Parses `xml` and evaluates the schema from its root context.
    pub fn parse(&self, xml: &str) -> Result<Record> {
        let document = XmlDocument::parse(xml)?;
        let root = document.root_node();
        let context = match &self.context {
            Some(xpath) => xpath.select(root)?,
            None => vec![root],
        };
        log::debug!(
            "Evaluating {} node(s) against {} context node(s)",
            self.nodes.len(),
            context.len()
        );
        self.evaluate(&context, None)
    }

    /// Evaluates every node against `context`. Typed, child and constant nodes
    /// are evaluated in declaration order, method nodes afterwards.
    pub fn evaluate(&self, context: &[XmlNode<'_>], parent: Option<&Scope<'_>>) -> Result<Record> {
        let mut record = Record::new();

        for node in &self.nodes {
            let value = match &node.binding {
                Binding::Typed {
                    evaluator,
                    converter,
                    defaults,
                } => evaluator.evaluate(context, converter, defaults)?,
                Binding::Child { evaluator, schema } => {
                    let scope = Scope::new(&record, parent);
                    let matches = evaluator.select(context)?;
                    if evaluator.is_array() {
                        let records = matches
                            .iter()
                            .map(|m| {
                                schema
                                    .evaluate(std::slice::from_ref(m), Some(&scope))
                                    .map(Value::Record)
                            })
                            .collect::<Result<Vec<_>>>()?;
                        Value::List(records)
                    } else {
                        let first = &matches[..matches.len().min(1)];
                        Value::Record(schema.evaluate(first, Some(&scope))?)
                    }
                }
                Binding::Constant(value) => value.clone(),
                Binding::Method(_) => continue,
            };
            let value = match &node.transform {
                Some(transform) => transform.apply(value, &Scope::new(&record, parent)),
                None => value,
            };
            log::trace!("Node '{}' evaluated to {}", node.name, value);
            record.insert(node.name.clone(), value);
        }

        for node in &self.nodes {
            if let Binding::Method(Method(method)) = &node.binding {
                let value = method(&Scope::new(&record, parent));
                record.insert(node.name.clone(), value);
            }
        }

        Ok(self
            .nodes
            .iter()
            .filter(|node| !node.private)
            .filter_map(|node| {
                record
                    .remove(&node.name)
                    .map(|value| (node.name.clone(), value))
            })
            .collect())
    }
}

#[derive(Debug)]
enum PendingBinding {
    Typed(NativeType),
    Child(Schema),
    Constant(Value),
    Method(Method),
}

#[derive(Debug)]
struct PendingNode {
    name: String,
    binding: PendingBinding,
    options: NodeOptions,
}

/// Collects node definitions; all validation happens in [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    context: Option<String>,
    local_context: Option<String>,
    nodes: Vec<PendingNode>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the XPath applied to the document before any node is evaluated.
    /// Only the first call has an effect.
    pub fn context(mut self, xpath: impl Into<String>) -> Self {
        if self.context.is_none() {
            self.context = Some(xpath.into());
        }
        self
    }

    pub fn node(
        self,
        name: impl Into<String>,
        native_type: NativeType,
        options: NodeOptions,
    ) -> Self {
        self.push(name.into(), PendingBinding::Typed(native_type), options)
    }

    /// A nested record (or list of records with `array`) evaluated from the matched node(s).
    pub fn child_node(self, name: impl Into<String>, schema: Schema, options: NodeOptions) -> Self {
        self.push(name.into(), PendingBinding::Child(schema), options)
    }

    pub fn constant_node(
        self,
        name: impl Into<String>,
        value: impl Into<Value>,
        private: bool,
    ) -> Self {
        let options = NodeOptions {
            private,
            ..NodeOptions::default()
        };
        self.push(name.into(), PendingBinding::Constant(value.into()), options)
    }

    pub fn method_node<F>(self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Value + Send + Sync + 'static,
    {
        let method = Method(Arc::new(method));
        self.push(name.into(), PendingBinding::Method(method), NodeOptions::default())
    }

    /// Nodes declared inside `declare` look up their XPaths from `xpath`,
    /// unless they set a local context of their own.
    pub fn with_context<F>(mut self, xpath: impl Into<String>, declare: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let outer = self.local_context.replace(xpath.into());
        let mut builder = declare(self);
        builder.local_context = outer;
        builder
    }

    fn push(mut self, name: String, binding: PendingBinding, mut options: NodeOptions) -> Self {
        if options.local_context.is_none() {
            options.local_context = self.local_context.clone();
        }
        self.nodes.push(PendingNode {
            name,
            binding,
            options,
        });
        self
    }

    pub fn build(self) -> Result<Schema> {
        let context = self
            .context
            .as_deref()
            .map(CompiledXPath::compile)
            .transpose()
            .map_err(|source: XPathError| Error::InvalidXPath {
                node: "context".to_string(),
                source,
            })?;

        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for PendingNode {
            name,
            binding,
            options,
        } in self.nodes
        {
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateNode(name));
            }
            let binding = match binding {
                PendingBinding::Typed(native_type) => Binding::Typed {
                    converter: Converter::new(native_type, options.format.as_deref())?,
                    evaluator: NodeEvaluator::compile(&name, &options)?,
                    defaults: Defaults {
                        default: options.default,
                        default_empty: options.default_empty,
                    },
                },
                PendingBinding::Child(schema) => Binding::Child {
                    evaluator: NodeEvaluator::compile(&name, &options)?,
                    schema,
                },
                PendingBinding::Constant(value) => Binding::Constant(value),
                PendingBinding::Method(method) => Binding::Method(method),
            };
            nodes.push(BoundNode {
                name,
                binding,
                private: options.private,
                transform: options.transform,
            });
        }

        log::debug!("Built schema with {} node(s)", nodes.len());
        Ok(Schema { context, nodes })
    }
}
