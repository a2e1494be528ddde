//! Common utilities and helper functions shared across commands.
//!
//! Prompting, reference-data loading, parameter grouping and the failure
//! policy live here so both collectors behave identically around them.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::{
    aqs::{types::CodeRow, AqsClient, CodeTable, Credentials, QueryOutcome},
    cli::types::{
        policy::FailurePolicy,
        time::{Year, YearRange},
    },
    AqsError, Result, EMAIL_ENV_VAR, KEY_ENV_VAR,
};

/// Largest number of parameter codes sent in the first group.
pub const PARAM_GROUP_SIZE: usize = 4;

/// Settings shared by both collectors.
#[derive(Debug, Clone)]
pub struct CollectParams {
    pub years: YearRange,
    pub output_dir: PathBuf,
    pub param_class: String,
    pub on_failure: FailurePolicy,
}

/// Print `label`, then read one line from `input` without its line ending.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Resolve email and key from the environment, prompting for whichever is
/// missing. With `mask_key` the key is read without echo.
pub fn resolve_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mask_key: bool,
) -> Result<Credentials> {
    let email = match non_empty_env(EMAIL_ENV_VAR) {
        Some(email) => email,
        None => prompt_line(input, output, "Email for query: ")?,
    };
    if email.trim().is_empty() {
        return Err(AqsError::MissingCredential {
            name: "Email".to_string(),
            env_var: EMAIL_ENV_VAR.to_string(),
        });
    }

    let key = match non_empty_env(KEY_ENV_VAR) {
        Some(key) => key,
        None if mask_key => rpassword::prompt_password("API key for query: ")?,
        None => prompt_line(input, output, "API key for query: ")?,
    };
    if key.trim().is_empty() {
        return Err(AqsError::MissingCredential {
            name: "API key".to_string(),
            env_var: KEY_ENV_VAR.to_string(),
        });
    }

    Ok(Credentials::new(email.trim(), key.trim()))
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Build the year range from CLI values, prompting for any that are missing.
pub fn resolve_years<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    first: Option<Year>,
    last: Option<Year>,
) -> Result<YearRange> {
    let first = match first {
        Some(year) => year,
        None => prompt_line(input, output, "First year of interest: ")?.parse::<Year>()?,
    };
    let last = match last {
        Some(year) => year,
        None => prompt_line(
            input,
            output,
            "Last year of interest (if only want one year put the same year): ",
        )?
        .parse::<Year>()?,
    };
    YearRange::new(first, last)
}

/// Split parameter codes into two comma-joined groups: the first
/// `PARAM_GROUP_SIZE` codes, then the rest, both in original order.
///
/// The second group is empty when there are no more than `PARAM_GROUP_SIZE` codes.
pub fn param_groups(codes: &[String]) -> [String; 2] {
    let split = codes.len().min(PARAM_GROUP_SIZE);
    let (head, tail) = codes.split_at(split);
    [head.join(","), tail.join(",")]
}

/// Index of the state to resume from.
///
/// An empty name starts at the first state; otherwise the name must match a
/// state's `value_represented` exactly, ignoring case.
pub fn find_start_index(states: &[CodeRow], start_state: &str) -> Result<usize> {
    let wanted = start_state.trim();
    if wanted.is_empty() {
        return Ok(0);
    }

    let wanted = wanted.to_lowercase();
    states
        .iter()
        .position(|row| row.value_represented.to_lowercase() == wanted)
        .ok_or_else(|| AqsError::UnknownState {
            name: start_state.to_string(),
        })
}

/// Unwrap a reference lookup the run cannot continue without.
pub fn require_data<T>(outcome: QueryOutcome<T>, endpoint: &str) -> Result<T> {
    match outcome {
        QueryOutcome::Data(data) => Ok(data),
        QueryOutcome::Status(status) => Err(AqsError::Status {
            endpoint: endpoint.to_string(),
            status,
        }),
    }
}

/// Apply the failure policy to a non-200 response.
///
/// `Skip` logs and returns `Ok`, `Abort` turns the status into an error.
pub fn on_failed_request(
    policy: FailurePolicy,
    endpoint: &str,
    status: u16,
    context: &str,
) -> Result<()> {
    match policy {
        FailurePolicy::Skip => {
            tracing::warn!(endpoint, status, context, "request failed; skipping");
            Ok(())
        }
        FailurePolicy::Abort => Err(AqsError::Status {
            endpoint: endpoint.to_string(),
            status,
        }),
    }
}

/// Fetch the state table and the parameter codes for `param_class`.
pub async fn load_reference_data(
    client: &mut AqsClient,
    param_class: &str,
) -> Result<(CodeTable, Vec<String>)> {
    let states = require_data(
        client.get_state_codes().await?,
        crate::aqs::http::STATES_ENDPOINT,
    )?;
    let params = require_data(
        client.get_param_codes_by_class(param_class).await?,
        crate::aqs::http::PARAMS_BY_CLASS_ENDPOINT,
    )?;

    tracing::info!(
        states = states.len(),
        params = params.len(),
        param_class,
        "loaded reference data"
    );
    Ok((states, params))
}

pub fn print_progress_banner(state: &str, year: Year) {
    println!("--------------------");
    println!("Collecting data for {} in {}", state, year);
    println!("--------------------");
}
