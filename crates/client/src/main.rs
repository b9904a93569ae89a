//! `pixi-sim`: runs the decision engine against a scripted world.
//!
//! # Examples
//!
//! ```bash
//! # Replay the demo scenario for 20 seconds of robot time
//! cargo run -p companion-client -- --scenario scenarios/demo.ron --ticks 600
//!
//! # Same, without waiting for the tick clock
//! cargo run -p companion-client -- --scenario scenarios/demo.ron --ticks 600 --fast
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use companion_client::{Scenario, build_engine, config, logging};
use companion_runtime::DecisionEvent;
use tokio::sync::broadcast;

/// Companion robot behavior simulator
#[derive(Parser, Debug)]
#[command(name = "pixi-sim")]
#[command(about = "Run the companion decision engine against a scripted world", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration (RON); falls back to PIXI_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor timeline (RON)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks; runs until Ctrl-C otherwise
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Tick as fast as possible instead of at the configured rate
    #[arg(long, requires = "ticks")]
    fast: bool,

    /// Session identifier used for the log directory; falls back to PIXI_SESSION_ID
    #[arg(long)]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let session = cli
        .session
        .clone()
        .or_else(|| std::env::var("PIXI_SESSION_ID").ok());
    let _guard = logging::setup_logging(session)?;

    let config = config::load(cli.config.as_deref())?;
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    tracing::info!(
        "scenario {:?}: {} events, tick rate {} Hz",
        scenario.name,
        scenario.events.len(),
        config.tick_hz
    );

    let mut engine = build_engine(config, scenario)?;
    let summary = tokio::spawn(summarize(engine.subscribe()));

    let ran = match (cli.ticks, cli.fast) {
        (Some(ticks), true) => {
            for _ in 0..ticks {
                engine.tick();
            }
            engine.stop();
            ticks
        }
        (Some(ticks), false) => engine.run_for(ticks, ctrl_c()).await,
        (None, _) => engine.run(ctrl_c()).await,
    };
    drop(engine);

    let winners = summary.await?;
    tracing::info!("simulation finished after {} ticks", ran);
    for (behavior, count) in winners {
        tracing::info!("  {:<22} selected {} times", behavior, count);
    }
    Ok(())
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

/// Counts behavior selections until the engine goes away.
async fn summarize(mut events: broadcast::Receiver<DecisionEvent>) -> BTreeMap<String, u32> {
    let mut winners = BTreeMap::new();
    loop {
        match events.recv().await {
            Ok(DecisionEvent::WinnerChanged { to, .. }) => {
                *winners.entry(to.to_string()).or_default() += 1;
            }
            Ok(DecisionEvent::BranchChanged { to, .. }) => {
                if let Some(reflex) = to.reflex() {
                    *winners.entry(reflex.to_string()).or_default() += 1;
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!("summary missed {} decision events", missed);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    winners
}
