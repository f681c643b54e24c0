//! Shared application state for the dashboard.
//!
//! The only mutable cell is the active tab. Everything else the handlers
//! touch is the compiled-in report snapshot.

use crate::data::{ValuationReport, REPORT};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Dashboard tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Sentiment,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Sentiment => "sentiment",
        }
    }

    /// Button label shown in the tab bar.
    pub fn label_zh(&self) -> &'static str {
        match self {
            Tab::Overview => "總覽",
            Tab::Sentiment => "市場情緒",
        }
    }

    /// Both tabs in display order.
    pub fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Sentiment]
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected tab name in a `/tab/:tab` request.
#[derive(Debug, Error)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(Tab::Overview),
            "sentiment" => Ok(Tab::Sentiment),
            other => Err(UnknownTab(other.to_string())),
        }
    }
}

/// Shared dashboard state.
pub struct DashboardState {
    /// The report snapshot every handler reads from.
    pub report: &'static ValuationReport,

    /// Currently selected tab.
    active_tab: RwLock<Tab>,
}

impl DashboardState {
    /// Create state over the compiled-in report.
    pub fn new() -> Arc<Self> {
        Self::with_report(&REPORT)
    }

    /// Create state over a specific report snapshot.
    pub fn with_report(report: &'static ValuationReport) -> Arc<Self> {
        Arc::new(Self {
            report,
            active_tab: RwLock::new(Tab::default()),
        })
    }

    /// Currently selected tab.
    pub async fn active_tab(&self) -> Tab {
        *self.active_tab.read().await
    }

    /// Select a tab. Re-selecting the active tab is a no-op.
    pub async fn select_tab(&self, tab: Tab) {
        let mut active = self.active_tab.write().await;
        if *active != tab {
            tracing::debug!("tab changed: {} -> {}", *active, tab);
            *active = tab;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_tab_is_overview() {
        assert_eq!(Tab::default(), Tab::Overview);
    }

    #[test]
    fn tab_parsing() {
        assert_eq!("overview".parse::<Tab>().unwrap(), Tab::Overview);
        assert_eq!("sentiment".parse::<Tab>().unwrap(), Tab::Sentiment);
        assert_eq!("SENTIMENT".parse::<Tab>().unwrap(), Tab::Sentiment);
        assert!("trends".parse::<Tab>().is_err());
        assert!("".parse::<Tab>().is_err());
    }

    #[test]
    fn tab_labels() {
        assert_eq!(Tab::Overview.label_zh(), "總覽");
        assert_eq!(Tab::Sentiment.label_zh(), "市場情緒");
        assert_eq!(Tab::all().len(), 2);
    }

    #[tokio::test]
    async fn state_starts_on_overview() {
        let state = DashboardState::new();
        assert_eq!(state.active_tab().await, Tab::Overview);
    }

    #[tokio::test]
    async fn tab_selection_round_trip() {
        let state = DashboardState::new();

        state.select_tab(Tab::Sentiment).await;
        assert_eq!(state.active_tab().await, Tab::Sentiment);

        state.select_tab(Tab::Overview).await;
        assert_eq!(state.active_tab().await, Tab::Overview);
    }

    #[tokio::test]
    async fn reselecting_active_tab_is_idempotent() {
        let state = DashboardState::new();

        state.select_tab(Tab::Sentiment).await;
        state.select_tab(Tab::Sentiment).await;
        assert_eq!(state.active_tab().await, Tab::Sentiment);
    }
}
