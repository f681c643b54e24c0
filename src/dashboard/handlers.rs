//! HTTP route handlers for the dashboard.
//!
//! This module contains the handler functions for all dashboard routes
//! (HTML page, HTMX tab partials, JSON API, health check) together with
//! the HTML renderers they delegate to.
//!
//! The renderers are pure: given the same tab and report snapshot they
//! produce byte-identical output. All display values come straight from
//! the compiled-in report; nothing is recomputed here.

use crate::dashboard::state::{DashboardState, Tab};
use crate::data::{
    ActivelyTradedStock, FearGreedEntry, FundFlowRow, HkFundFlows, IndexSummary, Insight,
    MarketDataEntry, Reference, UsFundFlows, ValuationReport,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// HTML PAGE HANDLERS (HTMX)
// ============================================================================

/// Main dashboard page, rendered for the currently selected tab.
pub async fn index_page(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    let tab = state.active_tab().await;
    Html(render_page(tab, state.report))
}

/// Tab selection endpoint. Returns the content fragment for HTMX to swap.
///
/// Unknown tab names are rejected without touching the selection.
pub async fn tab_panel(
    State(state): State<Arc<DashboardState>>,
    Path(tab): Path<String>,
) -> Response {
    match tab.parse::<Tab>() {
        Ok(tab) => {
            state.select_tab(tab).await;
            Html(render_content(tab, state.report)).into_response()
        }
        Err(err) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
    }
}

// ============================================================================
// API HANDLERS (JSON)
// ============================================================================

/// Full report snapshot as JSON.
pub async fn api_report(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report)
}

/// Index P/E summaries as JSON.
pub async fn api_indices(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report.indices)
}

/// Per-source market data table as JSON.
pub async fn api_market_data(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report.market_data)
}

/// Fear & greed readings as JSON.
pub async fn api_sentiment(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report.fear_greed)
}

/// Fund flow tables as JSON.
pub async fn api_fund_flows(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report.fund_flows)
}

/// Citation list as JSON.
pub async fn api_references(State(state): State<Arc<DashboardState>>) -> impl IntoResponse {
    Json(state.report.references)
}

// ============================================================================
// PAGE SHELL
// ============================================================================

/// Render the full HTML document for the given tab.
pub fn render_page(tab: Tab, report: &ValuationReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>歷史本益比分析報告</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <link rel="stylesheet" href="/styles.css">
</head>
<body class="bg-gray-100 min-h-screen">
    <div class="max-w-6xl mx-auto px-4 py-8">
        <header class="text-center mb-8">
            <h1 class="text-3xl font-bold text-gray-800">歷史本益比分析報告</h1>
            <p class="text-sm text-gray-500 mt-2">{author} · {date}</p>
        </header>
{content}
    </div>
</body>
</html>
"#,
        author = html_escape(report.summary.author),
        date = html_escape(report.summary.date),
        content = render_content(tab, report),
    )
}

/// Render the swappable content fragment: tab bar plus the active panel.
pub fn render_content(tab: Tab, report: &ValuationReport) -> String {
    let panel = match tab {
        Tab::Overview => render_overview(report),
        Tab::Sentiment => render_sentiment(report),
    };

    format!(
        r#"<div id="content">
    <div class="mb-6 border-b-2 border-gray-200">
{tab_bar}    </div>
{panel}</div>
"#,
        tab_bar = render_tab_bar(tab),
        panel = panel,
    )
}

fn render_tab_bar(active: Tab) -> String {
    let mut html = String::new();

    for tab in Tab::all() {
        let class = if *tab == active {
            "bg-blue-600 text-white"
        } else {
            "bg-gray-100 text-gray-700 hover:bg-gray-200"
        };

        html.push_str(&format!(
            r##"        <button hx-get="/tab/{id}" hx-target="#content" hx-swap="outerHTML"
                class="px-5 py-2 mr-2 rounded-t-md text-sm font-medium {class}">{label}</button>
"##,
            id = tab.as_str(),
            class = class,
            label = tab.label_zh(),
        ));
    }

    html
}

// ============================================================================
// OVERVIEW PANEL
// ============================================================================

/// Render the overview panel: index cards, the per-source market data
/// table, and the insight cards, all in store order.
pub fn render_overview(report: &ValuationReport) -> String {
    let mut html = String::from(
        r#"    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4 mb-8">
"#,
    );

    for index in report.indices {
        html.push_str(&render_index_card(index));
    }

    html.push_str("    </div>\n");
    html.push_str(&render_market_table(report.market_data));
    html.push_str(&render_insights(report.insights));
    html
}

fn render_index_card(index: &IndexSummary) -> String {
    format!(
        r#"        <div class="bg-white rounded-lg shadow p-5">
            <h3 class="text-lg font-semibold text-gray-900 mb-3">{name}</h3>
            <div class="text-sm text-gray-500 mb-1">歷史平均：<span class="font-bold text-gray-900">{avg}</span></div>
            <div class="text-sm text-gray-500 mb-1">當前水平：<span class="font-bold text-lg text-gray-900">{pe}</span></div>
            <div class="text-sm text-gray-500">狀態：<span class="font-bold {status_class}">{status}</span></div>
        </div>
"#,
        name = html_escape(index.name),
        avg = index.historical_avg_pe,
        pe = index.current_pe,
        status_class = index.status.css_class(),
        status = index.status.label(),
    )
}

fn render_market_table(entries: &[MarketDataEntry]) -> String {
    let mut html = String::from(
        r#"    <div class="bg-white rounded-lg shadow overflow-hidden mb-8">
        <div class="px-6 py-4 border-b border-gray-200">
            <h3 class="text-lg font-medium text-gray-900">各數據來源本益比對照</h3>
        </div>
        <table class="min-w-full divide-y divide-gray-200">
            <thead class="bg-gray-50">
                <tr>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">市場</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">數據來源</th>
                    <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">歷史平均</th>
                    <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">當前本益比</th>
                    <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">變化</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">狀態</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">說明</th>
                </tr>
            </thead>
            <tbody class="bg-white divide-y divide-gray-200">
"#,
    );

    for entry in entries {
        let change_class = if entry.change >= 0.0 {
            "text-red-600"
        } else {
            "text-green-600"
        };

        html.push_str(&format!(
            r#"                <tr class="hover:bg-gray-50">
                    <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{market}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{source}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900 text-right">{historical:.2}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900 text-right">{current:.2}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm {change_class} text-right font-medium">{change:+.1}%</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm font-bold {status_class}">{status}</td>
                    <td class="px-6 py-4 text-sm text-gray-500">{description}</td>
                </tr>
"#,
            market = html_escape(entry.market),
            source = html_escape(entry.source),
            historical = entry.historical,
            current = entry.current,
            change_class = change_class,
            change = entry.change,
            status_class = entry.status.css_class(),
            status = entry.status.label(),
            description = html_escape(entry.description),
        ));
    }

    html.push_str("            </tbody>\n        </table>\n    </div>\n");
    html
}

fn render_insights(insights: &[Insight]) -> String {
    let mut html = String::from(
        r#"    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
"#,
    );

    for insight in insights {
        html.push_str(&format!(
            r#"        <div class="bg-white rounded-lg shadow p-5">
            <h4 class="text-base font-semibold text-gray-900 mb-2">{title}</h4>
            <p class="text-sm text-gray-600">{content}</p>
        </div>
"#,
            title = html_escape(insight.title),
            content = html_escape(insight.content),
        ));
    }

    html.push_str("    </div>\n");
    html
}

// ============================================================================
// SENTIMENT PANEL
// ============================================================================

/// Render the sentiment panel: one gauge per fear & greed reading, the
/// fund flow tables for both regions, and the citation list.
pub fn render_sentiment(report: &ValuationReport) -> String {
    let mut html = String::from(
        r#"    <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-8">
"#,
    );

    for entry in report.fear_greed {
        html.push_str(&render_gauge_card(entry));
    }

    html.push_str("    </div>\n");
    html.push_str(&render_us_fund_flows(&report.fund_flows.us));
    html.push_str(&render_hk_fund_flows(&report.fund_flows.hk));
    html.push_str(&render_references(report.references));
    html
}

fn render_gauge_card(entry: &FearGreedEntry) -> String {
    format!(
        r#"        <div class="bg-white rounded-lg shadow p-8 text-center">
            <h3 class="text-lg font-medium text-gray-900">{region}恐懼與貪婪指數</h3>
            <div class="text-5xl font-bold {value_class} my-5">{value}</div>
            <p class="text-gray-600">{sentiment}</p>
            <p class="text-sm text-gray-400 mt-2">{description}</p>
            <p class="text-xs text-gray-400 mt-4">{source} · 更新於 {last_updated}</p>
        </div>
"#,
        region = entry.region.label_zh(),
        value_class = entry.sentiment.css_class(),
        value = entry.value,
        sentiment = entry.sentiment.label_zh(),
        description = html_escape(entry.description),
        source = html_escape(entry.source),
        last_updated = entry.last_updated,
    )
}

fn render_us_fund_flows(flows: &UsFundFlows) -> String {
    let mut html = format!(
        r#"    <div class="bg-white rounded-lg shadow overflow-hidden mb-8">
        <div class="px-6 py-4 border-b border-gray-200">
            <h3 class="text-lg font-medium text-gray-900">美國資金流向</h3>
            <p class="text-sm text-gray-500 mt-2">{summary}</p>
        </div>
        <table class="min-w-full divide-y divide-gray-200">
            <thead class="bg-gray-50">
                <tr>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">類別</th>
                    <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">資金流向</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">期間</th>
                </tr>
            </thead>
            <tbody class="bg-white divide-y divide-gray-200">
"#,
        summary = html_escape(flows.summary),
    );

    for row in flows.details {
        html.push_str(&render_fund_flow_row(row));
    }

    html.push_str(&format!(
        r#"            </tbody>
        </table>
        <div class="px-6 py-3 bg-gray-50 text-xs text-gray-400">{source} · 更新於 {last_updated}</div>
    </div>
"#,
        source = html_escape(flows.source),
        last_updated = flows.last_updated,
    ));

    html
}

fn render_fund_flow_row(row: &FundFlowRow) -> String {
    // Flow amounts are signed display strings; only the sign is inspected
    // for coloring.
    let flow_class = if row.flow.starts_with('-') {
        "text-red-600"
    } else {
        "text-green-600"
    };

    format!(
        r#"                <tr class="hover:bg-gray-50">
                    <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{category}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm {flow_class} text-right font-medium">{flow}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{period}</td>
                </tr>
"#,
        category = html_escape(row.category),
        flow_class = flow_class,
        flow = html_escape(row.flow),
        period = html_escape(row.period),
    )
}

fn render_hk_fund_flows(flows: &HkFundFlows) -> String {
    let snapshot = [
        ("成交額", flows.northbound.turnover),
        ("成交筆數", flows.northbound.trades),
        ("每日額度餘額", flows.northbound.daily_quota_balance),
        ("ETF成交額", flows.northbound.etf_turnover),
    ];

    let mut html = format!(
        r#"    <div class="bg-white rounded-lg shadow overflow-hidden mb-8">
        <div class="px-6 py-4 border-b border-gray-200">
            <h3 class="text-lg font-medium text-gray-900">香港滬深港通資金流向</h3>
            <p class="text-sm text-gray-500 mt-2">{summary}</p>
        </div>
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4 px-6 py-4">
"#,
        summary = html_escape(flows.summary),
    );

    for (label, value) in snapshot {
        html.push_str(&format!(
            r#"            <div class="bg-gray-50 rounded-md p-4">
                <div class="text-xs font-medium text-gray-500">{label}</div>
                <div class="text-lg font-bold text-gray-900 mt-1">{value}</div>
            </div>
"#,
            label = label,
            value = html_escape(value),
        ));
    }

    html.push_str(
        r#"        </div>
        <table class="min-w-full divide-y divide-gray-200">
            <thead class="bg-gray-50">
                <tr>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">排名</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">代碼</th>
                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">名稱</th>
                    <th class="px-6 py-3 text-right text-xs font-medium text-gray-500 uppercase tracking-wider">成交額</th>
                </tr>
            </thead>
            <tbody class="bg-white divide-y divide-gray-200">
"#,
    );

    for stock in flows.top_traded {
        html.push_str(&render_top_traded_row(stock));
    }

    html.push_str(&format!(
        r#"            </tbody>
        </table>
        <div class="px-6 py-3 bg-gray-50 text-xs text-gray-400">{source} · 更新於 {last_updated}</div>
    </div>
"#,
        source = html_escape(flows.source),
        last_updated = flows.last_updated,
    ));

    html
}

fn render_top_traded_row(stock: &ActivelyTradedStock) -> String {
    format!(
        r#"                <tr class="hover:bg-gray-50">
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">{rank}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900">{code}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{name}</td>
                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900 text-right">{turnover}</td>
                </tr>
"#,
        rank = stock.rank,
        code = html_escape(stock.code),
        name = html_escape(stock.name),
        turnover = html_escape(stock.turnover),
    )
}

fn render_references(references: &[Reference]) -> String {
    let mut html = String::from(
        r#"    <div class="bg-white rounded-lg shadow p-6">
        <h3 class="text-lg font-medium text-gray-900 mb-4">參考資料</h3>
        <ol class="list-decimal list-inside space-y-2">
"#,
    );

    for reference in references {
        html.push_str(&format!(
            r#"            <li class="text-sm text-gray-600"><a href="{url}" class="text-blue-600 hover:underline" target="_blank" rel="noopener">{title}</a></li>
"#,
            url = html_escape(reference.url),
            title = html_escape(reference.title),
        ));
    }

    html.push_str("        </ol>\n    </div>\n");
    html
}

/// Simple HTML escaping to prevent broken markup.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

// ============================================================================
// HEALTH CHECK
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub timestamp: i64,
}

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

pub async fn health_check() -> impl IntoResponse {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    let uptime = start.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::REPORT;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("S&P 500"), "S&amp;P 500");
    }

    #[test]
    fn overview_renders_one_card_per_index_in_order() {
        let html = render_overview(&REPORT);

        let positions: Vec<usize> = REPORT
            .indices
            .iter()
            .map(|i| html.find(i.name).expect("index card missing"))
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("當前水平").count(), REPORT.indices.len());
    }

    #[test]
    fn sp500_card_shows_stored_status_and_color() {
        let card = render_index_card(&REPORT.indices[0]);
        assert!(card.contains("標普500"));
        assert!(card.contains("28.5"));
        assert!(card.contains("16.8"));
        assert!(card.contains("高估"));
        assert!(card.contains("text-red-600"));
    }

    #[test]
    fn hsi_card_is_undervalued_green() {
        let card = render_index_card(&REPORT.indices[3]);
        assert!(card.contains("恒生指數"));
        assert!(card.contains("低估"));
        assert!(card.contains("text-green-600"));
    }

    #[test]
    fn market_table_shows_literal_changes_and_statuses() {
        let html = render_market_table(REPORT.market_data);
        assert!(html.contains("+72.2%"));
        assert!(html.contains("-15.4%"));
        assert!(html.contains("輕微高估"));
        assert!(html.contains("S&amp;P 500 (CAPE)"));
    }

    #[test]
    fn sentiment_renders_both_gauges_verbatim() {
        let html = render_sentiment(&REPORT);

        assert!(html.contains("美國市場恐懼與貪婪指數"));
        assert!(html.contains(">29</div>"));
        assert!(html.contains("恐懼"));
        assert!(html.contains("text-orange-500"));

        assert!(html.contains("香港市場恐懼與貪婪指數"));
        assert!(html.contains(">66.56</div>"));
        assert!(html.contains("貪婪"));
        assert!(html.contains("text-green-500"));
    }

    #[test]
    fn sentiment_renders_fund_flows_and_references() {
        let html = render_sentiment(&REPORT);

        assert!(html.contains("+770億美元"));
        assert!(html.contains("-870億美元"));
        assert!(html.contains("1659.41億人民幣"));
        assert!(html.contains("ZIJIN MINING"));
        assert!(html.contains("參考資料"));
        assert!(html.contains("https://www.multpl.com/"));
    }

    #[test]
    fn fund_flow_rows_colored_by_stored_sign() {
        let inflow = render_fund_flow_row(&REPORT.fund_flows.us.details[0]);
        assert!(inflow.contains("text-green-600"));

        let outflow = render_fund_flow_row(&REPORT.fund_flows.us.details[3]);
        assert!(outflow.contains("text-red-600"));
    }

    #[test]
    fn tab_bar_highlights_only_the_active_tab() {
        let overview = render_content(Tab::Overview, &REPORT);
        assert_eq!(overview.matches("bg-blue-600").count(), 1);
        assert!(overview.contains(r#"hx-get="/tab/overview""#));
        assert!(overview.contains(r#"hx-get="/tab/sentiment""#));

        let active_pos = overview.find("bg-blue-600").unwrap();
        let overview_btn = overview.find(r#"hx-get="/tab/overview""#).unwrap();
        let sentiment_btn = overview.find(r#"hx-get="/tab/sentiment""#).unwrap();
        assert!(overview_btn < active_pos && active_pos < sentiment_btn);
    }

    #[test]
    fn content_shows_only_the_active_panel() {
        let overview = render_content(Tab::Overview, &REPORT);
        assert!(overview.contains("歷史平均"));
        assert!(!overview.contains("恐懼與貪婪指數"));

        let sentiment = render_content(Tab::Sentiment, &REPORT);
        assert!(sentiment.contains("恐懼與貪婪指數"));
        assert!(!sentiment.contains("當前水平"));
    }

    #[test]
    fn rendering_is_pure() {
        assert_eq!(
            render_page(Tab::Overview, &REPORT),
            render_page(Tab::Overview, &REPORT)
        );
        assert_eq!(
            render_content(Tab::Sentiment, &REPORT),
            render_content(Tab::Sentiment, &REPORT)
        );
    }

    #[tokio::test]
    async fn tab_handler_switches_and_returns_panel() {
        let state = DashboardState::new();

        let response = tab_panel(State(state.clone()), Path("sentiment".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.active_tab().await, Tab::Sentiment);

        let response = tab_panel(State(state.clone()), Path("overview".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.active_tab().await, Tab::Overview);
    }

    #[tokio::test]
    async fn unknown_tab_is_rejected_without_state_change() {
        let state = DashboardState::new();
        state.select_tab(Tab::Sentiment).await;

        let response = tab_panel(State(state.clone()), Path("trends".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.active_tab().await, Tab::Sentiment);
    }

    #[tokio::test]
    async fn index_page_serves_html() {
        let state = DashboardState::new();
        let response = index_page(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
