//! Entry point: parse CLI, resolve prompts, and dispatch to a collector.

use std::time::Duration;

use anyhow::Context;
use aqs_county::{
    aqs::{AqsClient, ClientOptions},
    cli::{AqsCli, CollectOpts, Commands},
    commands::{
        common::{prompt_line, resolve_credentials, resolve_years},
        resumable::collect_by_state,
        single_output::collect_all,
        CollectParams,
    },
    DEFAULT_INTERVAL_SECS,
};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Resolve credentials and years, then build the client and shared params.
fn prepare(
    opts: CollectOpts,
    mask_key: bool,
    default_interval_secs: f64,
) -> anyhow::Result<(AqsClient, CollectParams)> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let credentials = resolve_credentials(&mut input, &mut output, mask_key)?;
    let years = resolve_years(&mut input, &mut output, opts.first_year, opts.last_year)?;

    let interval = opts.interval_secs.unwrap_or(default_interval_secs);
    let min_interval = Duration::try_from_secs_f64(interval)
        .with_context(|| format!("invalid --interval-secs value {}", interval))?;

    let client = AqsClient::new(
        credentials,
        ClientOptions {
            base_url: opts.base_url,
            min_interval,
            timeout: opts.timeout_secs.map(Duration::from_secs),
        },
    )?;

    let params = CollectParams {
        years,
        output_dir: opts.output_dir,
        param_class: opts.param_class,
        on_failure: opts.on_failure,
    };

    Ok((client, params))
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let app = AqsCli::parse();

    match app.command {
        Commands::Collect { opts, start_state } => {
            let (mut client, params) = prepare(opts, true, DEFAULT_INTERVAL_SECS)?;
            let start_state = match start_state {
                Some(name) => name,
                None => prompt_line(
                    &mut std::io::stdin().lock(),
                    &mut std::io::stdout(),
                    "State to start from (blank for the first state): ",
                )?,
            };

            let written = collect_by_state(&mut client, &params, &start_state)
                .await
                .context("per-state collection failed")?;
            println!("✓ Collection complete: {} file(s) written", written.len());
        }

        Commands::CollectAll { opts } => {
            let (mut client, params) = prepare(opts, false, 0.0)?;

            let path = collect_all(&mut client, &params)
                .await
                .context("collection failed")?;
            println!("✓ Collection complete: {}", path.display());
        }
    }

    Ok(())
}
