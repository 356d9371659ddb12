// src/options.rs
use crate::schema::Scope;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Which XML name a node binds to when no explicit XPath is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// The node's own name (singularized for array nodes).
    NodeName,
    Named(String),
}

/// Post-processes an evaluated value with access to the surrounding records.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(Value, &Scope<'_>) -> Value + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value, &Scope<'_>) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value, scope: &Scope<'_>) -> Value {
        (self.0)(value, scope)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Options shared by typed and child nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeOptions {
    pub xpath: Option<String>,
    pub element: Option<Tag>,
    pub attribute: Option<Tag>,
    pub self_node: bool,
    pub array: bool,
    pub format: Option<String>,
    pub default: Option<Value>,
    pub default_empty: Option<Value>,
    pub private: bool,
    pub local_context: Option<String>,
    pub transform: Option<Transform>,
}

impl NodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// An explicit XPath, overriding any tag options.
    pub fn xpath(mut self, xpath: impl Into<String>) -> Self {
        self.xpath = Some(xpath.into());
        self
    }

    pub fn element_named(mut self, name: impl Into<String>) -> Self {
        self.element = Some(Tag::Named(name.into()));
        self
    }

    pub fn attribute(mut self) -> Self {
        self.attribute = Some(Tag::NodeName);
        self
    }

    pub fn attribute_named(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(Tag::Named(name.into()));
        self
    }

    /// Binds to the context node itself.
    pub fn self_node(mut self) -> Self {
        self.self_node = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_empty(mut self, value: impl Into<Value>) -> Self {
        self.default_empty = Some(value.into());
        self
    }

    /// Evaluated and visible to transforms, but left out of the output record.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn local_context(mut self, xpath: impl Into<String>) -> Self {
        self.local_context = Some(xpath.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &Scope<'_>) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Transform::new(f));
        self
    }
}
