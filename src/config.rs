// src/config.rs
//! JSON mapping files describing a schema.
//!
//! ```json
//! {
//!   "context": "document",
//!   "nodes": [
//!     { "name": "title" },
//!     { "name": "length", "type": "duration", "format": "{M}:{S2}" },
//!     { "name": "items", "type": "child", "array": true,
//!       "nodes": [{ "name": "value", "type": "integer", "attribute": true }] }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::native_type::NativeType;
use crate::options::{NodeOptions, Tag};
use crate::schema::{Schema, SchemaBuilder};
use crate::value::Value;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingConfig {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// `true` binds to the node's own name, a string to that name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagConfig {
    Flag(bool),
    Name(String),
}

impl TagConfig {
    fn to_tag(&self) -> Option<Tag> {
        match self {
            TagConfig::Flag(true) => Some(Tag::NodeName),
            TagConfig::Flag(false) => None,
            TagConfig::Name(name) => Some(Tag::Named(name.clone())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub name: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    #[serde(default)]
    pub xpath: Option<String>,
    #[serde(default)]
    pub element: Option<TagConfig>,
    #[serde(default)]
    pub attribute: Option<TagConfig>,
    #[serde(rename = "self", default)]
    pub self_node: bool,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub default: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub default_empty: Option<serde_json::Value>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub local_context: Option<String>,
    /// Nodes of a `child` schema.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    /// Value of a `constant` node.
    #[serde(default, deserialize_with = "present")]
    pub value: Option<serde_json::Value>,
}

/// A key given as `null` is `Some(Null)`; only an absent key is `None`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

fn default_node_type() -> String {
    NativeType::Text.name().to_string()
}

impl NodeConfig {
    fn options(&self) -> NodeOptions {
        NodeOptions {
            xpath: self.xpath.clone(),
            element: self.element.as_ref().and_then(TagConfig::to_tag),
            attribute: self.attribute.as_ref().and_then(TagConfig::to_tag),
            self_node: self.self_node,
            array: self.array,
            format: self.format.clone(),
            default: self.default.clone().map(Value::from),
            default_empty: self.default_empty.clone().map(Value::from),
            private: self.private,
            local_context: self.local_context.clone(),
            transform: None,
        }
    }

    fn declare(&self, builder: SchemaBuilder) -> Result<SchemaBuilder> {
        match self.node_type.as_str() {
            "child" => {
                let schema = build_nodes(Schema::builder(), &self.nodes)?.build()?;
                Ok(builder.child_node(&self.name, schema, self.options()))
            }
            "constant" => {
                let value = self.value.clone().map(Value::from).ok_or_else(|| {
                    Error::Config(format!("constant node '{}' has no value", self.name))
                })?;
                Ok(builder.constant_node(&self.name, value, self.private))
            }
            other => {
                let native_type = NativeType::from_str(other)?;
                Ok(builder.node(&self.name, native_type, self.options()))
            }
        }
    }
}

fn build_nodes(builder: SchemaBuilder, nodes: &[NodeConfig]) -> Result<SchemaBuilder> {
    nodes.iter().try_fold(builder, |builder, node| node.declare(builder))
}

impl MappingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading mapping from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn build_schema(&self) -> Result<Schema> {
        let mut builder = Schema::builder();
        if let Some(context) = &self.context {
            builder = builder.context(context);
        }
        build_nodes(builder, &self.nodes)?.build()
    }
}

impl FromStr for MappingConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}
