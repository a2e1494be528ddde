//! Whole-run collection into a single CSV.
//!
//! Requests one parameter code at a time and holds every batch in memory until
//! the last state finishes, then writes `AQS_county_data_<years>.csv` with a
//! leading row-index column.

use std::path::PathBuf;

use crate::{
    aqs::{
        http::{ANNUAL_BY_COUNTY_ENDPOINT, COUNTIES_ENDPOINT},
        AqsClient, QueryOutcome, RecordSet,
    },
    core::{output_path, write_csv},
    Result, NON_US_STATE_ROWS,
};

use super::common::{load_reference_data, on_failed_request, print_progress_banner, CollectParams};

/// Collect every state into one CSV and return its path.
pub async fn collect_all(client: &mut AqsClient, params: &CollectParams) -> Result<PathBuf> {
    let (state_table, param_codes) = load_reference_data(client, &params.param_class).await?;

    let mut batches: Vec<RecordSet> = Vec::new();

    for state in state_table.without_trailing(NON_US_STATE_ROWS) {
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

            for param in &param_codes {
                for county in &counties {
                    match client
                        .aqs_api_annual_county(param, &bdate, &edate, &state.code, county)
                        .await?
                    {
                        QueryOutcome::Data(records) => batches.push(records),
                        QueryOutcome::Status(status) => on_failed_request(
                            params.on_failure,
                            ANNUAL_BY_COUNTY_ENDPOINT,
                            status,
                            &format!(
                                "{} county {} param {} {}",
                                state.value_represented, county, param, year
                            ),
                        )?,
                    }
                }
            }
        }
    }

    let data = RecordSet::concat(batches);
    let path = output_path(&params.output_dir, None, &params.years);
    write_csv(&path, &data, true)?;
    println!("Wrote {} rows to {}", data.len(), path.display());

    Ok(path)
}
