//! Market Valuation Dashboard
//!
//! Serves the hand-curated P/E and market sentiment report as a web page
//! with a two-tab toggle, plus a read-only JSON API over the same data.

use anyhow::Result;
use pe_dashboard::dashboard::{DashboardConfig, DashboardServer, DashboardState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pe_dashboard=info".parse()?),
        )
        .init();

    let state = DashboardState::new();
    let report = state.report;

    info!("{} ({})", report.summary.title, report.summary.date);
    info!(
        "   {} index cards, {} market data rows, {} sentiment gauges, {} references",
        report.indices.len(),
        report.market_data.len(),
        report.fear_greed.len(),
        report.references.len()
    );

    let config = DashboardConfig::from_env();
    DashboardServer::with_config(state, config).run().await
}
