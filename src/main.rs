//! power-sim entry point: CLI wiring, validation, and renderer selection.

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use power_sim::cli::Args;
use power_sim::io::export::{export_events, export_series};
use power_sim::reporting;
use power_sim::sim::engine::Engine;
use power_sim::sim::summary::RunSummary;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let args = Args::parse();
    let scenario = args.load_scenario()?;

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }
    for w in scenario.warnings() {
        warn!("{w}");
    }

    let config = scenario.to_simulation_config();
    debug!(?config, "simulation config");

    #[cfg(feature = "tui")]
    if args.tui {
        return power_sim::tui::run(config).context("terminal UI failed");
    }

    reporting::print_banner(&scenario);
    let run = Engine::new(config).run();
    if !args.quiet {
        reporting::print_status_lines(&run);
    }
    let summary = RunSummary::from_run(&run);
    reporting::print_summary(&summary);

    if let Some(path) = &args.series_out {
        export_series(&run, path)
            .with_context(|| format!("failed to write series to {}", path.display()))?;
        info!(path = %path.display(), rows = run.series.len(), "series written");
    }
    if let Some(path) = &args.events_out {
        export_events(&run, path)
            .with_context(|| format!("failed to write events to {}", path.display()))?;
        info!(path = %path.display(), events = run.toggles.len(), "events written");
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(power_sim::api::AppState::new(run));
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(power_sim::api::serve(state, addr))
            .context("API server failed")?;
    }

    Ok(())
}
