// src/error.rs
use crate::native_type::NativeType;
use thiserror::Error;
use xmlbind_duration::DurationError;
use xmlbind_xpath::XPathError;

/// Errors raised while building a schema or binding a document to it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("XPath evaluation failed: {0}")]
    XPath(#[from] XPathError),

    #[error("Invalid XPath for node '{node}': {source}")]
    InvalidXPath {
        node: String,
        #[source]
        source: XPathError,
    },

    #[error("Duration parsing failed: {0}")]
    Duration(#[from] DurationError),

    #[error("Cannot parse '{input}' as a date/time with format '{format}': {source}")]
    DateTime {
        input: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Please provide a format option to {0} nodes.")]
    NoFormatProvided(NativeType),

    #[error("Cannot create node with unknown node type '{0}'.")]
    UnknownNodeType(String),

    #[error("Node '{0}' is defined more than once")]
    DuplicateNode(String),

    #[error("Invalid mapping configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
