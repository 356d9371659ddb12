pub mod fixtures;

use serde_json::Value;
use xmlbind::{MappingConfig, Schema};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Bind `xml` to `schema` and return the record as JSON
pub fn bind(schema: &Schema, xml: &str) -> Result<Value, xmlbind::Error> {
    Ok(schema.parse(xml)?.to_json())
}

/// Build a schema from a JSON mapping and bind `xml` to it
pub fn bind_with_mapping(mapping: &Value, xml: &str) -> Result<Value, xmlbind::Error> {
    let config: MappingConfig = serde_json::from_value(mapping.clone())?;
    bind(&config.build_schema()?, xml)
}
