use std::env;
use std::fs;
use xmlbind::{Error, MappingConfig};

/// Binds an XML document to a JSON mapping and prints the resulting record.
fn main() -> Result<(), Error> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Binds an XML document to the schema described by a JSON mapping.");
        eprintln!();
        eprintln!("Usage: {} <path/to/mapping.json> <path/to/document.xml>", args[0]);
        eprintln!();
        eprintln!("Set RUST_LOG=debug to trace schema evaluation.");
        std::process::exit(1);
    }

    let mapping_path = &args[1];
    let document_path = &args[2];

    log::info!("Loading mapping from {}", mapping_path);
    let schema = MappingConfig::from_file(mapping_path)?.build_schema()?;

    log::info!("Binding {}", document_path);
    let xml = fs::read_to_string(document_path)?;
    let record = schema.parse(&xml)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
