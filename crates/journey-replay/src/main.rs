//! Headless replay of scripted zone-editing sessions
//!
//! Prints one JSON line per published snapshot, per debounced journey query,
//! and optionally per rendered frame. Logs go to stderr.

mod cli;
mod debounce;
mod replay;
mod script;

use clap::Parser;

use crate::cli::ReplayArgs;
use crate::replay::ReplayOptions;
use crate::script::ReplayScript;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journey_replay=info,journey_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = ReplayArgs::parse();
    let config = args.zone_config()?;
    let script = ReplayScript::load(&args.script)?;

    tracing::info!(
        "Replaying {} step(s) over {} ms",
        script.steps.len(),
        script.duration_ms()
    );

    let options = ReplayOptions {
        debounce_ms: args.debounce_ms,
        features: args.features,
    };
    let stdout = std::io::stdout();
    let summary = replay::run(config, &script, options, stdout.lock())?;

    tracing::info!(
        "Replay finished: {} event(s), {} applied, {} ignored, {} rejected, {} snapshot(s), {} query(s)",
        summary.events,
        summary.applied,
        summary.ignored,
        summary.rejected,
        summary.snapshots,
        summary.queries
    );
    Ok(())
}
