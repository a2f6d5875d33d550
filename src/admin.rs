//! Admin stats viewer.
//!
//! Fetches the backend's aggregate statistics once and turns them into a
//! [`StatsView`]: three counters, the recent and failed lists, and the
//! per-day line chart. Rendering is left to the surfaces (`ui::admin` for
//! HTML, `terminal` for text).

use chrono::NaiveDate;
use serde::Serialize;

use crate::backend::{Backend, StatsPayload};

/// Chart dataset label.
pub const CHART_LABEL: &str = "Queries per Day";
const CHART_BORDER: &str = "rgba(75, 192, 192, 1)";
const CHART_FILL: &str = "rgba(75, 192, 192, 0.2)";

/// Outcome of loading the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    /// Stats fetched.
    Loaded(StatsView),
    /// The stats request failed. The error has been logged; nothing else is
    /// shown to the user.
    Unavailable,
}

impl Dashboard {
    /// The view, if loaded.
    pub fn view(&self) -> Option<&StatsView> {
        match self {
            Self::Loaded(view) => Some(view),
            Self::Unavailable => None,
        }
    }
}

/// Loads the dashboard from a backend.
#[derive(Debug)]
pub struct AdminDashboard;

impl AdminDashboard {
    /// Issue one stats request and build the view.
    pub async fn load(backend: &dyn Backend) -> Dashboard {
        match backend.fetch_stats().await {
            Ok(stats) => {
                tracing::debug!(
                    total = stats.total_queries,
                    recent = stats.recent_queries.len(),
                    failed = stats.failed_questions.len(),
                    "Admin stats loaded"
                );
                Dashboard::Loaded(StatsView::from_payload(stats))
            }
            Err(e) => {
                tracing::error!(name: "admin.stats.failed", error = %e, "Error fetching stats");
                Dashboard::Unavailable
            }
        }
    }
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// Recent exchanges, in payload order.
    pub recent: Vec<RecentItem>,
    /// Failed questions, in payload order.
    pub failed_questions: Vec<String>,
    pub chart: ChartSpec,
}

/// One row of the recent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentItem {
    pub query: String,
    pub summary: String,
}

impl StatsView {
    /// Build the view from a payload.
    pub fn from_payload(stats: StatsPayload) -> Self {
        let recent = stats
            .recent_queries
            .into_iter()
            .map(|q| RecentItem {
                query: q.query,
                summary: q.summary,
            })
            .collect();

        let mut days: Vec<(String, u64)> = stats.daily_stats.into_iter().collect();
        days.sort_by_cached_key(|(date, _)| day_sort_key(date));
        let (labels, values) = days.into_iter().unzip();

        Self {
            total: stats.total_queries,
            successful: stats.successful,
            failed: stats.failed,
            recent,
            failed_questions: stats.failed_questions,
            chart: ChartSpec::line(labels, values),
        }
    }
}

/// Parsed dates first in calendar order, then anything unparseable by text.
fn day_sort_key(date: &str) -> (bool, Option<NaiveDate>, String) {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
    (parsed.is_none(), parsed, date.to_string())
}

/// Chart.js configuration for the per-day line chart.
///
/// Serializes to exactly the object passed to `new Chart(ctx, config)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: &'static str,
    pub data: Vec<u64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: serde_json::Value,
}

impl ChartSpec {
    /// Line chart of `values` over `labels`.
    pub fn line(labels: Vec<String>, values: Vec<u64>) -> Self {
        Self {
            kind: "line",
            data: ChartData {
                labels,
                datasets: vec![ChartDataset {
                    label: CHART_LABEL,
                    data: values,
                    border_color: CHART_BORDER,
                    background_color: CHART_FILL,
                }],
            },
            options: ChartOptions {
                responsive: true,
                scales: serde_json::json!({ "y": { "beginAtZero": true } }),
            },
        }
    }

    /// Date labels, in display order.
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// Counts matching [`Self::labels`].
    pub fn values(&self) -> &[u64] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecentQuery;

    fn payload() -> StatsPayload {
        StatsPayload {
            total_queries: 5,
            successful: 4,
            failed: 1,
            recent_queries: vec![
                RecentQuery {
                    query: "When is the exam?".into(),
                    summary: "Monday".into(),
                },
                RecentQuery {
                    query: "Fees?".into(),
                    summary: "See office".into(),
                },
            ],
            failed_questions: vec!["Where is room 9?".into()],
            daily_stats: [
                ("2024-05-10".to_string(), 2),
                ("2024-04-30".to_string(), 3),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_view_keeps_counts_and_order() {
        let view = StatsView::from_payload(payload());
        assert_eq!((view.total, view.successful, view.failed), (5, 4, 1));
        assert_eq!(view.recent.len(), 2);
        assert_eq!(view.recent[0].query, "When is the exam?");
        assert_eq!(view.recent[1].summary, "See office");
        assert_eq!(view.failed_questions, vec!["Where is room 9?".to_string()]);
    }

    #[test]
    fn test_chart_is_chronological() {
        let view = StatsView::from_payload(payload());
        assert_eq!(view.chart.labels(), ["2024-04-30", "2024-05-10"]);
        assert_eq!(view.chart.values(), [3, 2]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut stats = payload();
        stats.daily_stats.insert("unknown".into(), 1);
        stats.daily_stats.insert("2023-12-31".into(), 7);
        let view = StatsView::from_payload(stats);
        assert_eq!(
            view.chart.labels(),
            ["2023-12-31", "2024-04-30", "2024-05-10", "unknown"]
        );
    }

    #[test]
    fn test_chart_config_json() {
        let chart = ChartSpec::line(vec!["2024-01-01".into()], vec![4]);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["datasets"][0]["label"], CHART_LABEL);
        assert_eq!(json["data"]["datasets"][0]["borderColor"], CHART_BORDER);
        assert_eq!(json["data"]["datasets"][0]["data"][0], 4);
        assert_eq!(json["options"]["scales"]["y"]["beginAtZero"], true);
    }

    #[test]
    fn test_empty_payload() {
        let view = StatsView::from_payload(StatsPayload::default());
        assert!(view.recent.is_empty());
        assert!(view.failed_questions.is_empty());
        assert!(view.chart.labels().is_empty());
        assert!(view.chart.values().is_empty());
    }
}
