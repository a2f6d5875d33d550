//! Admin dashboard page.

use super::components::{stat_card, titled_card};
use super::html_escape;
use super::shell::{Nav, html_shell};
use crate::admin::{ChartSpec, Dashboard, StatsView};

/// The full dashboard page.
///
/// An unavailable dashboard renders the same skeleton with empty counters
/// and lists and no chart.
pub fn page(dashboard: &Dashboard) -> String {
    let view = dashboard.view();
    let counter = |f: fn(&StatsView) -> u64| view.map(|v| f(v).to_string()).unwrap_or_default();

    let counters = format!(
        r#"<div class="grid grid-cols-1 md:grid-cols-3 gap-4">{}{}{}</div>"#,
        stat_card("Total Queries", "total", &counter(|v| v.total)),
        stat_card("Successful", "successful", &counter(|v| v.successful)),
        stat_card("Failed", "failed", &counter(|v| v.failed)),
    );

    let recent = view.map(recent_items).unwrap_or_default();
    let failed = view.map(failed_items).unwrap_or_default();
    let lists = format!(
        r#"<div class="grid grid-cols-1 md:grid-cols-2 gap-4">{}{}</div>"#,
        titled_card(
            "Recent Queries",
            &format!(r#"<ul id="recent" class="space-y-2">{recent}</ul>"#)
        ),
        titled_card(
            "Failed Questions",
            &format!(r#"<ul id="failed-list" class="space-y-2">{failed}</ul>"#)
        ),
    );

    let chart = titled_card(
        "Queries per Day",
        r#"<canvas id="dailyChart" height="120"></canvas>"#,
    );

    let content = format!(
        r#"<div class="space-y-6">
    <h1 class="text-2xl font-bold">Admin Dashboard</h1>
    {counters}
    {lists}
    {chart}
</div>"#
    );

    let scripts = view
        .map(|v| chart_script(&v.chart))
        .unwrap_or_default();

    html_shell("Admin", Nav::Admin, &content, &scripts)
}

/// `<li>` items for the recent list, in order.
pub fn recent_items(view: &StatsView) -> String {
    view.recent
        .iter()
        .map(|item| {
            format!(
                r#"<li class="p-2 bg-gray-50 rounded"><strong>Q:</strong> {}<br><strong>A:</strong> {}</li>"#,
                html_escape(&item.query),
                html_escape(&item.summary)
            )
        })
        .collect()
}

/// `<li>` items for the failed list, in order.
pub fn failed_items(view: &StatsView) -> String {
    view.failed_questions
        .iter()
        .map(|q| {
            format!(
                r#"<li class="p-2 bg-red-50 rounded text-red-700">{}</li>"#,
                html_escape(q)
            )
        })
        .collect()
}

/// Chart.js bootstrap with the config embedded as JSON.
fn chart_script(chart: &ChartSpec) -> String {
    let config = match serde_json::to_string(chart) {
        Ok(json) => json.replace("</", r"<\/"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize chart config");
            return String::new();
        }
    };

    format!(
        r#"<script src="/static/vendor/chart.umd.min.js"></script>
<script type="application/json" id="dailyChart-config">{config}</script>
<script>
    new Chart(
        document.getElementById('dailyChart').getContext('2d'),
        JSON.parse(document.getElementById('dailyChart-config').textContent)
    );
</script>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecentQuery, StatsPayload};

    fn dashboard(recent: usize, failed: usize) -> Dashboard {
        let stats = StatsPayload {
            total_queries: (recent + failed) as u64,
            successful: recent as u64,
            failed: failed as u64,
            recent_queries: (0..recent)
                .map(|i| RecentQuery {
                    query: format!("question {i}"),
                    summary: format!("answer {i}"),
                })
                .collect(),
            failed_questions: (0..failed).map(|i| format!("failed {i}")).collect(),
            daily_stats: [("2024-05-01".to_string(), 4)].into_iter().collect(),
        };
        Dashboard::Loaded(StatsView::from_payload(stats))
    }

    fn list_section<'a>(html: &'a str, id: &str) -> &'a str {
        let start = html.find(&format!(r#"id="{id}""#)).unwrap();
        let end = start + html[start..].find("</ul>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_list_item_counts() {
        let html = page(&dashboard(3, 2));
        assert_eq!(list_section(&html, "recent").matches("<li").count(), 3);
        assert_eq!(list_section(&html, "failed-list").matches("<li").count(), 2);
    }

    #[test]
    fn test_lists_keep_payload_order() {
        let html = page(&dashboard(3, 0));
        let recent = list_section(&html, "recent");
        let first = recent.find("question 0").unwrap();
        let last = recent.find("question 2").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_counters_and_chart() {
        let html = page(&dashboard(2, 1));
        assert!(html.contains(r#"id="total" class="text-3xl font-bold">3</p>"#));
        assert!(html.contains(r#"id="failed" class="text-3xl font-bold">1</p>"#));
        assert!(html.contains(r#""labels":["2024-05-01"]"#));
        assert!(html.contains("new Chart("));
    }

    #[test]
    fn test_unavailable_renders_skeleton() {
        let html = page(&Dashboard::Unavailable);
        assert!(html.contains(r#"id="total" class="text-3xl font-bold"></p>"#));
        assert_eq!(list_section(&html, "recent").matches("<li").count(), 0);
        assert!(!html.contains("new Chart("));
    }

    #[test]
    fn test_script_close_tag_in_labels_is_neutralized() {
        let view = StatsView::from_payload(StatsPayload {
            daily_stats: [("</script>".to_string(), 1)].into_iter().collect(),
            ..StatsPayload::default()
        });
        let script = chart_script(&view.chart);
        assert_eq!(script.matches("</script>").count(), 3);
    }
}
