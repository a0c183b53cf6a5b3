//! Block commands
//!
//! Usage: folio block <put|delete> ...

use clap::{Args, Subcommand};
use folio_core::output::block_output_schema;
use folio_engine::commands::parse_id;
use folio_engine::HandlerConfig;
use std::path::Path;

use super::{open_handler, print_json, print_one, CliResult, InputArgs};

#[derive(Debug, Args)]
pub struct BlockArgs {
    #[command(subcommand)]
    pub command: BlockCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlockCommand {
    /// Create a block, or update one when an id is given
    Put(PutArgs),
    /// Delete a block
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// Block to update; omit to create
    pub id: Option<String>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn execute(db: &Path, args: BlockArgs) -> CliResult {
    let (_store, handler) = open_handler(db, HandlerConfig::default())?;

    match args.command {
        BlockCommand::Put(put) => {
            let block_id = put.id.as_deref().map(|id| parse_id("id", id)).transpose()?;
            let block = handler.write_block(block_id, &put.input.load()?)?;
            print_one(&block_output_schema(), &block)
        }
        BlockCommand::Delete(DeleteArgs { id }) => {
            let ack = handler.delete_block(parse_id("id", &id)?)?;
            print_json(&ack)
        }
    }
}
