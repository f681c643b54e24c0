//! Compiled-in market valuation report.
//!
//! Every figure shown by the dashboard lives here as a literal: index P/E
//! summaries, the per-source market data table, fear & greed readings for
//! the US and Hong Kong, fund flow tables, analyst insights, and the
//! citation list. The report is a single `static` snapshot; handlers and
//! renderers only ever read it.
//!
//! Status and sentiment classifications are part of the source data. They
//! are stored as-is and never re-derived from the numeric columns, so the
//! displayed labels always match the published report even where the
//! numbers and the label would suggest otherwise.

use serde::Serialize;

// ============================================================================
// CLASSIFICATION ENUMS
// ============================================================================

/// Valuation classification as published in the source report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValuationStatus {
    #[serde(rename = "高估")]
    Overvalued,
    #[serde(rename = "低估")]
    Undervalued,
    #[serde(rename = "輕微高估")]
    SlightlyOvervalued,
}

impl ValuationStatus {
    /// Display label (traditional Chinese, as published).
    pub fn label(&self) -> &'static str {
        match self {
            ValuationStatus::Overvalued => "高估",
            ValuationStatus::Undervalued => "低估",
            ValuationStatus::SlightlyOvervalued => "輕微高估",
        }
    }

    /// Fixed cosmetic color mapping for the label.
    pub fn css_class(&self) -> &'static str {
        match self {
            ValuationStatus::Overvalued => "text-red-600",
            ValuationStatus::Undervalued => "text-green-600",
            ValuationStatus::SlightlyOvervalued => "text-yellow-600",
        }
    }
}

/// Market region for the sentiment gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Hk,
}

impl Region {
    pub fn label_zh(&self) -> &'static str {
        match self {
            Region::Us => "美國市場",
            Region::Hk => "香港市場",
        }
    }
}

/// Fear & greed sentiment classification, stored with the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Fear,
    Greed,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Fear => "Fear",
            Sentiment::Greed => "Greed",
        }
    }

    pub fn label_zh(&self) -> &'static str {
        match self {
            Sentiment::Fear => "恐懼",
            Sentiment::Greed => "貪婪",
        }
    }

    /// Fixed cosmetic color mapping for the gauge value.
    pub fn css_class(&self) -> &'static str {
        match self {
            Sentiment::Fear => "text-orange-500",
            Sentiment::Greed => "text-green-500",
        }
    }
}

// ============================================================================
// ENTITIES
// ============================================================================

/// Report masthead.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportSummary {
    pub title: &'static str,
    pub author: &'static str,
    pub date: &'static str,
    pub description: &'static str,
}

/// One index card on the overview panel.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexSummary {
    pub name: &'static str,
    pub current_pe: f64,
    pub historical_avg_pe: f64,
    pub status: ValuationStatus,
}

/// One row of the per-source market data table.
///
/// `change` is an independent literal from the report, not recomputed from
/// `historical`/`current`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarketDataEntry {
    pub market: &'static str,
    pub source: &'static str,
    pub historical: f64,
    pub current: f64,
    pub change: f64,
    pub status: ValuationStatus,
    pub description: &'static str,
}

/// Analyst commentary card.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub content: &'static str,
}

/// One fear & greed gauge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FearGreedEntry {
    pub region: Region,
    pub value: f64,
    pub sentiment: Sentiment,
    pub description: &'static str,
    pub source: &'static str,
    pub last_updated: &'static str,
}

/// One row of the US fund flow table. Flow amounts are signed display
/// strings straight from the report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FundFlowRow {
    pub category: &'static str,
    pub flow: &'static str,
    pub period: &'static str,
}

/// US fund flow section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsFundFlows {
    pub last_updated: &'static str,
    pub summary: &'static str,
    pub details: &'static [FundFlowRow],
    pub source: &'static str,
}

/// Northbound Stock Connect snapshot, opaque display figures.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConnectSnapshot {
    pub turnover: &'static str,
    pub trades: &'static str,
    pub daily_quota_balance: &'static str,
    pub etf_turnover: &'static str,
}

/// One entry of the HK top-10 actively traded list.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivelyTradedStock {
    pub rank: u32,
    pub code: &'static str,
    pub name: &'static str,
    pub turnover: &'static str,
}

/// Hong Kong fund flow section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HkFundFlows {
    pub last_updated: &'static str,
    pub summary: &'static str,
    pub northbound: ConnectSnapshot,
    pub top_traded: &'static [ActivelyTradedStock],
    pub source: &'static str,
}

/// Fund flows for both regions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FundFlows {
    pub us: UsFundFlows,
    pub hk: HkFundFlows,
}

/// Citation entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reference {
    pub id: u32,
    pub title: &'static str,
    pub url: &'static str,
}

/// The full report snapshot served by the dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValuationReport {
    pub summary: ReportSummary,
    pub indices: &'static [IndexSummary],
    pub market_data: &'static [MarketDataEntry],
    pub insights: &'static [Insight],
    pub fear_greed: &'static [FearGreedEntry],
    pub fund_flows: FundFlows,
    pub references: &'static [Reference],
}

// ============================================================================
// THE REPORT
// ============================================================================

/// The hand-curated report, October 2025 edition.
pub static REPORT: ValuationReport = ValuationReport {
    summary: ReportSummary {
        title: "主要市場指數歷史本益比分析報告",
        author: "Manus AI",
        date: "2025年10月",
        description: "本報告對主要全球股票市場指數的歷史本益比進行了深入分析，包括標準普爾500指數、道瓊工業平均指數、納斯達克綜合指數以及恒生指數。同時整合了美國和香港市場的恐懼與貪婪指數，提供更全面的市場情緒分析。",
    },

    indices: &[
        IndexSummary {
            name: "標普500",
            current_pe: 28.5,
            historical_avg_pe: 16.8,
            status: ValuationStatus::Overvalued,
        },
        IndexSummary {
            name: "道瓊工業",
            current_pe: 26.8,
            historical_avg_pe: 15.2,
            status: ValuationStatus::Overvalued,
        },
        IndexSummary {
            name: "納斯達克",
            current_pe: 35.2,
            historical_avg_pe: 22.4,
            status: ValuationStatus::Overvalued,
        },
        IndexSummary {
            name: "恒生指數",
            current_pe: 9.2,
            historical_avg_pe: 12.8,
            status: ValuationStatus::Undervalued,
        },
    ],

    market_data: &[
        MarketDataEntry {
            market: "S&P 500 (CAPE)",
            source: "Shiller",
            historical: 17.90,
            current: 30.81,
            change: 72.2,
            status: ValuationStatus::Overvalued,
            description: "Shiller CAPE 比率目前為30.81，比歷史平均值17.90高出72.2%。這一水平接近歷史高點，暗示市場可能存在泡沫風險。",
        },
        MarketDataEntry {
            market: "S&P 500",
            source: "multpl.com",
            historical: 15.50,
            current: 28.16,
            change: 81.7,
            status: ValuationStatus::Overvalued,
            description: "來自 multpl.com 的數據顯示更為極端的情況，當前本益比28.16比歷史平均值15.50高出81.7%。",
        },
        MarketDataEntry {
            market: "道瓊工業平均",
            source: "investorsfriend.com",
            historical: 20.10,
            current: 17.00,
            change: -15.4,
            status: ValuationStatus::Undervalued,
            description: "唯一顯示相對低估的主要美國指數，當前本益比17.00比歷史平均值20.10低15.4%。",
        },
        MarketDataEntry {
            market: "NASDAQ",
            source: "fullratio.com",
            historical: 29.56,
            current: 39.85,
            change: 34.8,
            status: ValuationStatus::Overvalued,
            description: "顯示出科技股的高估值特徵，當前本益比39.85比歷史平均值29.56高出34.8%。",
        },
        MarketDataEntry {
            market: "恒生指數",
            source: "HSI 數據",
            historical: 11.83,
            current: 12.60,
            change: 6.5,
            status: ValuationStatus::SlightlyOvervalued,
            description: "表現相對穩定，當前本益比12.60僅比歷史平均值11.83高出6.5%。",
        },
    ],

    insights: &[
        Insight {
            title: "美國市場普遍高估",
            content: "除道瓊工業平均指數外，美國主要股票市場普遍處於歷史高估值水平，要求投資者在配置資產時更加謹慎。",
        },
        Insight {
            title: "估值差異提供機會",
            content: "不同市場間的估值差異為分散投資提供了機會。道瓊工業平均指數的相對低估值可能為價值投資者提供機會。",
        },
        Insight {
            title: "亞洲市場相對穩定",
            content: "恒生指數的溫和估值水平可能為尋求國際多元化的投資者提供選擇。",
        },
    ],

    fear_greed: &[
        FearGreedEntry {
            region: Region::Us,
            value: 29.0,
            sentiment: Sentiment::Fear,
            description: "美國市場當前處於恐懼狀態，投資者情緒偏向謹慎，可能為逢低買入的機會。",
            source: "CNN Fear & Greed Index",
            last_updated: "2025-10-11",
        },
        FearGreedEntry {
            region: Region::Hk,
            value: 66.56,
            sentiment: Sentiment::Greed,
            description: "香港市場當前處於貪婪狀態，投資者情緒樂觀，建議謹慎評估風險。",
            source: "MacroMicro MM Hong Kong Fear & Greed Index",
            last_updated: "2025-10-03",
        },
    ],

    fund_flows: FundFlows {
        us: UsFundFlows {
            last_updated: "2025-08-31",
            summary: "2025年8月，美國長期共同基金和交易所交易基金 (ETFs) 共流入770億美元，是自2025年2月以來最大的單月流入。應稅債券基金持續強勁，流入近650億美元。黃金持續受到青睞，流入約60億美元。美國股票基金在過去四個月流出近870億美元，其中增長型基金是主要原因，但被動型ETF仍有大量資金流入。",
            details: &[
                FundFlowRow {
                    category: "長期共同基金和ETF",
                    flow: "+770億美元",
                    period: "2025年8月",
                },
                FundFlowRow {
                    category: "應稅債券基金",
                    flow: "+650億美元",
                    period: "2025年8月",
                },
                FundFlowRow {
                    category: "大宗商品基金 (黃金)",
                    flow: "+60億美元",
                    period: "2025年8月",
                },
                FundFlowRow {
                    category: "美國股票基金",
                    flow: "-870億美元",
                    period: "過去四個月",
                },
                FundFlowRow {
                    category: "增長型基金",
                    flow: "-1000億美元",
                    period: "過去一年",
                },
                FundFlowRow {
                    category: "大型混合型基金 (被動型ETF)",
                    flow: "+2170億美元",
                    period: "過去一年",
                },
            ],
            source: "Morningstar",
        },
        hk: HkFundFlows {
            last_updated: "2025-10-10",
            summary: "香港交易所滬深港通數據顯示，2025年10月10日上海港股通成交額為1659.41億人民幣，其中多隻科技和金融股活躍。",
            northbound: ConnectSnapshot {
                turnover: "1659.41億人民幣",
                trades: "676.86萬",
                daily_quota_balance: "可用",
                etf_turnover: "31.13億人民幣",
            },
            top_traded: &[
                ActivelyTradedStock {
                    rank: 1,
                    code: "601899",
                    name: "ZIJIN MINING",
                    turnover: "42.64億人民幣",
                },
                ActivelyTradedStock {
                    rank: 2,
                    code: "601138",
                    name: "FOXCONN INDUSTRIAL INTERNET",
                    turnover: "27.52億人民幣",
                },
                ActivelyTradedStock {
                    rank: 3,
                    code: "688256",
                    name: "CAMBRICON TECHNOLOGIES CORPORATION",
                    turnover: "23.10億人民幣",
                },
                ActivelyTradedStock {
                    rank: 4,
                    code: "688041",
                    name: "HYGON INFORMATION TECHNOLOGY",
                    turnover: "21.75億人民幣",
                },
                ActivelyTradedStock {
                    rank: 5,
                    code: "603259",
                    name: "WUXI APPTEC",
                    turnover: "21.18億人民幣",
                },
                ActivelyTradedStock {
                    rank: 6,
                    code: "600036",
                    name: "CHINA MERCHANTS BANK",
                    turnover: "19.58億人民幣",
                },
                ActivelyTradedStock {
                    rank: 7,
                    code: "601127",
                    name: "SERES GROUP",
                    turnover: "18.94億人民幣",
                },
                ActivelyTradedStock {
                    rank: 8,
                    code: "601688",
                    name: "HUATAI SECURITIES",
                    turnover: "18.76億人民幣",
                },
                ActivelyTradedStock {
                    rank: 9,
                    code: "600519",
                    name: "KWEICHOW MOUTAI",
                    turnover: "18.59億人民幣",
                },
                ActivelyTradedStock {
                    rank: 10,
                    code: "688008",
                    name: "MONTAGE TECHNOLOGY",
                    turnover: "16.86億人民幣",
                },
            ],
            source: "HKEX Stock Connect",
        },
    },

    references: &[
        Reference {
            id: 1,
            title: "Robert Shiller, Yale University",
            url: "http://www.econ.yale.edu/~shiller/data.htm",
        },
        Reference {
            id: 2,
            title: "Multpl.com - S&P 500 PE Ratio",
            url: "https://www.multpl.com/",
        },
        Reference {
            id: 3,
            title: "InvestorsFriend.com - Dow Jones PE Ratio",
            url: "https://www.investorsfriend.com/",
        },
        Reference {
            id: 4,
            title: "FullRatio.com - NASDAQ PE Ratio",
            url: "https://www.fullratio.com/",
        },
        Reference {
            id: 5,
            title: "CNN Fear & Greed Index",
            url: "https://www.cnn.com/markets/fear-and-greed",
        },
        Reference {
            id: 6,
            title: "MacroMicro - Hong Kong Fear & Greed Index",
            url: "https://en.macromicro.me/series/46930/hong-kong-mm-fear-and-greed-index",
        },
        Reference {
            id: 7,
            title: "Morningstar - US Fund Flows",
            url: "https://www.morningstar.com/business/insights/blog/funds/us-fund-flows",
        },
        Reference {
            id: 8,
            title: "HKEX - Historical Daily Stock Connect",
            url: "https://www.hkex.com.hk/Mutual-Market/Stock-Connect/Statistics/Historical-Daily?sc_lang=en",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_cards_in_published_order() {
        let names: Vec<&str> = REPORT.indices.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["標普500", "道瓊工業", "納斯達克", "恒生指數"]);
    }

    #[test]
    fn sp500_card_matches_source() {
        let sp500 = &REPORT.indices[0];
        assert_eq!(sp500.current_pe, 28.5);
        assert_eq!(sp500.historical_avg_pe, 16.8);
        assert_eq!(sp500.status, ValuationStatus::Overvalued);
    }

    #[test]
    fn status_is_stored_not_derived() {
        // The HSI card says 低估 while the HSI market-data row says 輕微高估.
        // Both classifications come from the source report and must coexist.
        let hsi_card = &REPORT.indices[3];
        assert_eq!(hsi_card.status, ValuationStatus::Undervalued);

        let hsi_row = &REPORT.market_data[4];
        assert_eq!(hsi_row.market, "恒生指數");
        assert_eq!(hsi_row.status, ValuationStatus::SlightlyOvervalued);
    }

    #[test]
    fn market_data_changes_are_literals() {
        let changes: Vec<f64> = REPORT.market_data.iter().map(|m| m.change).collect();
        assert_eq!(changes, vec![72.2, 81.7, -15.4, 34.8, 6.5]);
    }

    #[test]
    fn two_sentiment_gauges() {
        assert_eq!(REPORT.fear_greed.len(), 2);

        let us = &REPORT.fear_greed[0];
        assert_eq!(us.region, Region::Us);
        assert_eq!(us.value, 29.0);
        assert_eq!(us.sentiment, Sentiment::Fear);

        let hk = &REPORT.fear_greed[1];
        assert_eq!(hk.region, Region::Hk);
        assert_eq!(hk.value, 66.56);
        assert_eq!(hk.sentiment, Sentiment::Greed);
    }

    #[test]
    fn fund_flow_tables_complete() {
        assert_eq!(REPORT.fund_flows.us.details.len(), 6);
        assert_eq!(REPORT.fund_flows.hk.top_traded.len(), 10);
        assert_eq!(REPORT.fund_flows.hk.top_traded[0].code, "601899");
        assert_eq!(REPORT.fund_flows.hk.top_traded[9].rank, 10);
    }

    #[test]
    fn references_complete() {
        assert_eq!(REPORT.references.len(), 8);
        assert_eq!(REPORT.references[0].id, 1);
        assert!(REPORT.references.iter().all(|r| r.url.starts_with("http")));
    }

    #[test]
    fn status_labels_and_colors_fixed() {
        assert_eq!(ValuationStatus::Overvalued.label(), "高估");
        assert_eq!(ValuationStatus::Overvalued.css_class(), "text-red-600");
        assert_eq!(ValuationStatus::Undervalued.label(), "低估");
        assert_eq!(ValuationStatus::Undervalued.css_class(), "text-green-600");
        assert_eq!(ValuationStatus::SlightlyOvervalued.label(), "輕微高估");
    }

    #[test]
    fn report_serializes_with_published_labels() {
        let json = serde_json::to_value(REPORT).unwrap();
        assert_eq!(json["indices"][0]["status"], "高估");
        assert_eq!(json["market_data"][4]["status"], "輕微高估");
        assert_eq!(json["fear_greed"][1]["value"], 66.56);
    }
}
