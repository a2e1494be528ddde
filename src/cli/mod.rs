//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use types::{policy::FailurePolicy, time::Year};

use crate::{AQS_BASE_URL, DEFAULT_OUTPUT_DIR, DEFAULT_PARAM_CLASS};

/// Options shared by both collection commands.
///
/// Anything left unset here is resolved from the environment or prompted for.
#[derive(Debug, Args)]
pub struct CollectOpts {
    /// First year of interest.
    #[clap(long)]
    pub first_year: Option<Year>,

    /// Last year of interest (same as `--first-year` for a single year).
    #[clap(long)]
    pub last_year: Option<Year>,

    /// Directory the CSV extracts are written to.
    #[clap(long, short, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// AQS parameter class whose codes are collected.
    #[clap(long, default_value = DEFAULT_PARAM_CLASS)]
    pub param_class: String,

    /// Minimum seconds between outbound requests.
    #[clap(long)]
    pub interval_secs: Option<f64>,

    /// Per-request timeout in seconds (client default when unset).
    #[clap(long)]
    pub timeout_secs: Option<u64>,

    /// What to do when AQS answers with a non-200 status.
    #[clap(long, value_enum, default_value_t = FailurePolicy::default())]
    pub on_failure: FailurePolicy,

    /// AQS API base URL.
    #[clap(long, default_value = AQS_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collect county annual summaries, writing one CSV per state.
    ///
    /// Requests are paced (2 seconds apart by default) and a run can be
    /// resumed from any state with `--start-state`.
    Collect {
        #[clap(flatten)]
        opts: CollectOpts,

        /// State name to resume from (case-insensitive; empty starts at the first state).
        #[clap(long)]
        start_state: Option<String>,
    },

    /// Collect county annual summaries for every state into a single CSV.
    ///
    /// Issues one request per parameter code and writes only once the whole
    /// run has finished.
    CollectAll {
        #[clap(flatten)]
        opts: CollectOpts,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "aqs-county",
    about = "Collect EPA AQS county annual summary data into CSV extracts"
)]
pub struct AqsCli {
    #[clap(subcommand)]
    pub command: Commands,
}
