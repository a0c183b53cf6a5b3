//! Job queue inspection
//!
//! Nothing here runs jobs; a worker consuming the queue marks them done.

use clap::{Args, Subcommand};
use folio_core_types::JobId;
use folio_store::SqliteStore;
use serde_json::json;
use std::path::Path;

use super::{print_json, CliResult};

#[derive(Debug, Args)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List queued jobs, oldest first
    Pending,
    /// Mark a job as done
    Done {
        job_id: String,
    },
}

pub fn execute(db: &Path, args: JobsArgs) -> CliResult {
    let store = SqliteStore::open(db)?;
    let jobs = store.jobs();

    match args.command {
        JobsCommand::Pending => print_json(&jobs.pending_jobs()?),
        JobsCommand::Done { job_id } => {
            let job_id = JobId::from_string(job_id);
            if !jobs.mark_done(&job_id)? {
                return Err(format!("Job ({}) is not pending", job_id).into());
            }
            print_json(&json!({ "done": job_id.as_str() }))
        }
    }
}
