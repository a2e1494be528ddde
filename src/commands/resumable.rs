//! Per-state collection with checkpointing.
//!
//! Walks the state list from an optional resume point and writes each state's
//! rows to its own CSV as soon as the next state begins, so an interrupted run
//! loses at most the state in progress. Parameter codes are sent in two
//! comma-joined groups to cut the request count.

use std::path::PathBuf;

use crate::{
    aqs::{
        http::{ANNUAL_BY_COUNTY_ENDPOINT, COUNTIES_ENDPOINT},
        AqsClient, QueryOutcome,
    },
    core::{output_path, write_csv, PendingFlush, StateBuffer},
    Result, NON_US_STATE_ROWS,
};

use super::common::{
    find_start_index, load_reference_data, on_failed_request, param_groups,
    print_progress_banner, CollectParams,
};

/// Collect every state from `start_state` onwards, one CSV per state.
///
/// Returns the paths written, in order. A state that collected no rows is
/// not written, except the last one, which is always flushed.
pub async fn collect_by_state(
    client: &mut AqsClient,
    params: &CollectParams,
    start_state: &str,
) -> Result<Vec<PathBuf>> {
    let (state_table, param_codes) = load_reference_data(client, &params.param_class).await?;
    let groups: Vec<String> = param_groups(&param_codes)
        .into_iter()
        .filter(|g| !g.is_empty())
        .collect();

    let states = state_table.without_trailing(NON_US_STATE_ROWS);
    let start = find_start_index(states, start_state)?;
    if start > 0 {
        println!("Resuming from {}", states[start].value_represented);
    }

    let mut buffer = StateBuffer::new();
    let mut written = Vec::new();

    for state in &states[start..] {
        if let Some(flush) = buffer.begin(&state.value_represented) {
            written.push(flush_state(flush, params)?);
        }

        let counties = match client.get_county_codes(&state.code).await? {
            QueryOutcome::Data(counties) => counties,
            QueryOutcome::Status(status) => {
                on_failed_request(
                    params.on_failure,
                    COUNTIES_ENDPOINT,
                    status,
                    &state.value_represented,
                )?;
                continue;
            }
        };

        for year in params.years.years() {
            print_progress_banner(&state.value_represented, year);
            let (bdate, edate) = (year.bdate(), year.edate());

            for (idx, county) in counties.iter().enumerate() {
                println!("county {}/{}", idx + 1, counties.len());

                for group in &groups {
                    match client
                        .aqs_api_annual_county(group, &bdate, &edate, &state.code, county)
                        .await?
                    {
                        QueryOutcome::Data(records) => buffer.push(records),
                        QueryOutcome::Status(status) => on_failed_request(
                            params.on_failure,
                            ANNUAL_BY_COUNTY_ENDPOINT,
                            status,
                            &format!("{} county {} {}", state.value_represented, county, year),
                        )?,
                    }
                }
            }
        }
    }

    if let Some(flush) = buffer.finish() {
        written.push(flush_state(flush, params)?);
    }

    Ok(written)
}

fn flush_state(flush: PendingFlush, params: &CollectParams) -> Result<PathBuf> {
    let path = output_path(&params.output_dir, Some(flush.state.as_str()), &params.years);
    write_csv(&path, &flush.records, false)?;
    println!(
        "Wrote {} rows for {} to {}",
        flush.records.len(),
        flush.state,
        path.display()
    );
    Ok(path)
}
