//! Binary crate for the `weather-query` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive query sessions
//! - Rendering view states as text

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod render;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "weather_query=warn,weather_query_core=warn",
        1 => "weather_query=debug,weather_query_core=debug",
        _ => "weather_query=trace,weather_query_core=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
