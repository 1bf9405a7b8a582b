mod cli;
mod config;
mod error;
mod report;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meshmon_feed::StatusFeed;

use crate::cli::Cli;
use crate::error::CheckError;
use crate::report::CheckReport;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Whatever happens, the monitoring system gets one line and one code.
    let report = match run(&cli).await {
        Ok(report) => report,
        Err(err) => CheckReport::failure(&err),
    };
    println!("{}", report.line);
    std::process::exit(report.state.exit_code());
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Diagnostics go to stderr; stdout belongs to the plugin line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<CheckReport, CheckError> {
    let resolved = config::resolve(cli)?;
    tracing::debug!(router = %cli.name, schema = %resolved.schema, "running check");

    let feed = StatusFeed::new(resolved.feed)?;
    let bytes = feed.fetch().await?;

    let report = match resolved.schema.locate(&bytes, &cli.name)? {
        Some(router) => CheckReport::for_router(&router, resolved.thresholds),
        None => CheckReport::not_found(&cli.name),
    };
    Ok(report)
}
