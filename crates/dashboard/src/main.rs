// Rust guideline compliant 2026-10-17

//! Fraud-monitoring dashboard entry point.
//!
//! Composition root: owns one `Store`, wires it to a `Simulator` through the
//! `TracedSink` adapter, logs a dashboard summary every ten seconds, and on
//! CTRL+C disconnects the simulator and prints the final state as JSON.
//!
//! # Usage
//!
//! ```text
//! # Run until CTRL+C with lifecycle and summary logs
//! RUST_LOG=info cargo run --bin fraud_dashboard
//!
//! # Also show every transition
//! RUST_LOG=debug cargo run --bin fraud_dashboard
//! ```

mod adapters;

use adapters::summary_reporter::SummaryReporter;
use adapters::traced_sink::TracedSink;
use anyhow::Context as _;
use simulator::{Simulator, SimulatorConfig};
use std::time::Duration;
use store::Store;
use tracing::Instrument as _;

/// Delay between two dashboard summaries.
const REPORT_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Dashboard defaults: 2-5 s between transactions, agents every 5-9 s.
    let config = SimulatorConfig::builder()
        .build()
        .context("failed to build simulator config")?;

    let store = Store::new();
    let sink = TracedSink::new(&store);
    let simulator = Simulator::new(config);
    let reporter = SummaryReporter::new(REPORT_PERIOD);

    simulator.initialize(&sink);

    // Both futures run forever; only CTRL+C ends the session.
    let session = async {
        tokio::join!(
            simulator.run().instrument(tracing::info_span!("simulator")),
            reporter.run(&store).instrument(tracing::info_span!("reporter"))
        )
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl_c")?;
            tracing::info!("main.shutdown: ctrl_c received, disconnecting simulator");
        }
        _ = session => {}
    }
    // The session future is dropped by now, so no timer can fire again.
    simulator.disconnect();

    let summary = reporter.report_once(&store);
    tracing::info!(
        transitions = sink.applied(),
        reports = reporter.reports(),
        connected = summary.is_connected,
        "main.finished"
    );

    let snapshot =
        serde_json::to_string_pretty(&*store.state()).context("failed to serialize final state")?;
    println!("{snapshot}");
    Ok(())
}
