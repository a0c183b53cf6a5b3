//! Subcommand implementations and the helpers they share

pub mod block;
pub mod jobs;
pub mod page;

use folio_core::output::{OutputSchema, GROUP_READ};
use folio_core::RawInput;
use folio_engine::{HandlerConfig, PageHandler};
use folio_store::SqliteStore;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open (and migrate) the store, then build a handler over it
pub(crate) fn open_handler(
    db: &Path,
    config: HandlerConfig,
) -> Result<(SqliteStore, PageHandler), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(db)?;
    let handler = PageHandler::from_store(&store, config);
    Ok((store, handler))
}

/// Raw input from `--data` or `--file`
#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// JSON object with the fields to write
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,

    /// File containing the JSON object
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub(crate) fn load(&self) -> Result<RawInput, Box<dyn std::error::Error>> {
        let text = match (&self.data, &self.file) {
            (Some(data), _) => data.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => return Err("Must specify either --data or --file".into()),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err("input must be a JSON object".into()),
        }
    }
}

/// Print one resource through the read group
pub(crate) fn print_one<T: Serialize>(schema: &OutputSchema, resource: &T) -> CliResult {
    print_json(&schema.shape(resource, GROUP_READ)?)
}

/// Print a list of resources through the read group
pub(crate) fn print_all<T: Serialize>(schema: &OutputSchema, resources: &[T]) -> CliResult {
    print_json(&schema.shape_all(resources, GROUP_READ)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
