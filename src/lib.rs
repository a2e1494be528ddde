//! EPA AQS County Data Collector
//!
//! Retrieves annual-summary air quality data from the EPA Air Quality System
//! (AQS) API and writes it out as CSV extracts, one file per state or one file
//! for the whole run.
//!
//! ## Features
//!
//! - **Reference Lookups**: State, county and parameter-class code tables
//! - **Annual Summaries**: County-level annual data per parameter group
//! - **Per-state Checkpoints**: Each state is written as soon as it finishes
//! - **Request Pacing**: Configurable minimum interval between requests
//! - **Failure Policy**: Skip or abort on non-200 responses, never retry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aqs_county::{
//!     aqs::{AqsClient, ClientOptions, Credentials},
//!     commands::{resumable::collect_by_state, CollectParams},
//!     FailurePolicy, Year, YearRange,
//! };
//!
//! # async fn example() -> aqs_county::Result<()> {
//! let mut client = AqsClient::new(
//!     Credentials::new("me@example.com", "my-key"),
//!     ClientOptions::default(),
//! )?;
//!
//! let params = CollectParams {
//!     years: YearRange::new(Year::new(2019), Year::new(2020))?,
//!     output_dir: "data".into(),
//!     param_class: "CRITERIA".to_string(),
//!     on_failure: FailurePolicy::Skip,
//! };
//!
//! collect_by_state(&mut client, &params, "").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set your AQS credentials to skip the interactive prompts:
//! ```bash
//! export AQS_EMAIL=me@example.com
//! export AQS_KEY=my-key
//! ```

pub mod aqs;
pub mod cli;
pub mod commands;
pub mod core;
pub mod error;

// Re-export commonly used types
pub use cli::types::{
    policy::FailurePolicy,
    time::{Year, YearRange},
};
pub use error::{AqsError, Result};

/// Base path for the AQS data API.
pub const AQS_BASE_URL: &str = "https://aqs.epa.gov/data/api";

pub const EMAIL_ENV_VAR: &str = "AQS_EMAIL";
pub const KEY_ENV_VAR: &str = "AQS_KEY";

pub const DEFAULT_PARAM_CLASS: &str = "CRITERIA";
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Default pause between requests for the per-state collector.
pub const DEFAULT_INTERVAL_SECS: f64 = 2.0;

/// Trailing non-US rows on the AQS state list that are never collected.
pub const NON_US_STATE_ROWS: usize = 2;
