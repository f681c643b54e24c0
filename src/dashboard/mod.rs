//! Web Dashboard Module
//!
//! This module serves the valuation report as a web dashboard. Built with
//! Axum, HTMX, and Tailwind CSS.
//!
//! # Features
//!
//! - **Two-tab page**: 總覽 (index P/E cards, market data table, insights)
//!   and 市場情緒 (fear & greed gauges, fund flows, references)
//! - **Server-rendered partials**: tab clicks swap an HTMX fragment
//! - **Read-only JSON API**: the same report snapshot as JSON
//! - **Health check**: status, version, and uptime
//!
//! # Usage
//!
//! ```rust,ignore
//! use pe_dashboard::dashboard::{DashboardServer, DashboardState};
//!
//! let state = DashboardState::new();
//! let server = DashboardServer::new(state);
//! server.run().await?;
//! ```

pub mod handlers;
pub mod server;
pub mod state;

pub use server::{DashboardConfig, DashboardServer};
pub use state::{DashboardState, Tab};
