//! Page commands
//!
//! Usage: folio page <list|get|blocks|put|delete|snapshot> ...

use clap::{Args, Subcommand};
use folio_core::output::{block_output_schema, page_output_schema};
use folio_engine::commands::parse_id;
use folio_engine::{DeletePolicy, HandlerConfig, ListPagesParams};
use std::path::Path;

use super::{open_handler, print_all, print_json, print_one, CliResult, InputArgs};

#[derive(Debug, Args)]
pub struct PageArgs {
    #[command(subcommand)]
    pub command: PageCommand,
}

#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// List pages
    List(ListArgs),
    /// Show one page
    Get(IdArgs),
    /// List a page's blocks in position order
    Blocks(IdArgs),
    /// Create a page, or update one when an id is given
    Put(PutArgs),
    /// Delete a page and, by default, its blocks
    Delete(DeleteArgs),
    /// Queue snapshot generation for a page
    Snapshot(IdArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// One-based page number
    #[arg(long)]
    pub page: Option<String>,

    /// Page size
    #[arg(long)]
    pub count: Option<String>,

    /// Only enabled (1) or disabled (0) pages
    #[arg(long)]
    pub enabled: Option<String>,

    /// Sort term as FIELD or FIELD=ASC|DESC; repeatable
    #[arg(long = "order-by")]
    pub order_by: Vec<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// Page to update; omit to create
    pub id: Option<String>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,

    /// Refuse to delete a page that still has blocks
    #[arg(long)]
    pub reject_non_empty: bool,
}

pub fn execute(db: &Path, args: PageArgs) -> CliResult {
    let mut config = HandlerConfig::default();
    if let PageCommand::Delete(DeleteArgs {
        reject_non_empty: true,
        ..
    }) = &args.command
    {
        config.delete_policy = DeletePolicy::RejectIfNonEmpty;
    }
    let (_store, handler) = open_handler(db, config)?;

    match args.command {
        PageCommand::List(list) => {
            let mut params = ListPagesParams {
                page: list.page,
                count: list.count,
                enabled: list.enabled,
                order_by: Vec::new(),
            };
            for term in &list.order_by {
                let (field, direction) = term.split_once('=').unwrap_or((term.as_str(), "ASC"));
                params = params.order_by(field, direction);
            }
            let pages = handler.list_pages(&params)?;
            print_all(&page_output_schema(), &pages)
        }
        PageCommand::Get(IdArgs { id }) => {
            let page = handler.get_page(parse_id("id", &id)?)?;
            print_one(&page_output_schema(), &page)
        }
        PageCommand::Blocks(IdArgs { id }) => {
            let blocks = handler.get_page_blocks(parse_id("id", &id)?)?;
            print_all(&block_output_schema(), &blocks)
        }
        PageCommand::Put(put) => {
            let page_id = put.id.as_deref().map(|id| parse_id("id", id)).transpose()?;
            let page = handler.write_page(page_id, &put.input.load()?)?;
            print_one(&page_output_schema(), &page)
        }
        PageCommand::Delete(delete) => {
            let ack = handler.delete_page(parse_id("id", &delete.id)?)?;
            print_json(&ack)
        }
        PageCommand::Snapshot(IdArgs { id }) => {
            let ack = handler.request_snapshot(parse_id("id", &id)?)?;
            print_json(&ack)
        }
    }
}
