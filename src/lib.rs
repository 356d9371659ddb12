//! Declarative binding of XML documents to typed records.
//!
//! A [`Schema`] names nodes, says where each one lives (an XPath, or one
//! derived from the node's name), and which native type its text converts to:
//!
//! ```no_run
//! use xmlbind::{NativeType, NodeOptions, Schema};
//!
//! let schema = Schema::builder()
//!     .context("document")
//!     .node("title", NativeType::Text, NodeOptions::new())
//!     .node("length", NativeType::Duration, NodeOptions::new().format("{M}:{S2}"))
//!     .node("refs", NativeType::Integer, NodeOptions::new().attribute().array())
//!     .build()?;
//! let record = schema.parse("<document><title>Song</title><length>3:07</length></document>")?;
//! println!("{}", record.to_json());
//! # Ok::<(), xmlbind::Error>(())
//! ```
//!
//! Schemas can also be loaded from JSON mapping files, see [`MappingConfig`].

pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod native_type;
pub mod node_xpath;
pub mod options;
pub mod schema;
pub mod value;

pub use config::{MappingConfig, NodeConfig, TagConfig};
pub use document::{XmlDocument, XmlNode};
pub use error::{Error, Result};
pub use evaluator::NodeEvaluator;
pub use native_type::{Converter, Defaults, NativeType};
pub use node_xpath::{NodeXPath, singularize};
pub use options::{NodeOptions, Tag, Transform};
pub use schema::{Method, Schema, SchemaBuilder, Scope};
pub use value::{Record, Value};

pub use xmlbind_duration as duration;
pub use xmlbind_xpath as xpath;
