//! HTML pages.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::{escape_html, render_heatmap_svg};
use crate::storage::{LocatedIp, StoreStats};

fn header(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<h1>{}</h1>
"#,
        escape_html(title),
        escape_html(title)
    )
}

const FOOTER: &str = "</body>\n</html>\n";

fn stats_panel(stats: &StoreStats) -> String {
    format!(
        r#"<section class="stats">
<div class="stat"><span class="value">{}</span><span class="label">Total IPs</span></div>
<div class="stat"><span class="value">{}</span><span class="label">Located</span></div>
<div class="stat"><span class="value">{}</span><span class="label">Pending</span></div>
<div class="stat"><span class="value">{}</span><span class="label">Sessions</span></div>
</section>
"#,
        stats.total_ips, stats.located_ips, stats.pending_ips, stats.total_sessions
    )
}

fn format_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

fn place(row: &LocatedIp) -> String {
    [&row.city, &row.region, &row.country]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main page: statistics, heatmap and the table of located IPs.
pub fn render_index(stats: &StoreStats, rows: &[LocatedIp]) -> String {
    let mut html = header("Shared IP Addresses Heatmap");
    html.push_str(&stats_panel(stats));
    html.push_str("<section class=\"map\">\n");
    html.push_str(&render_heatmap_svg(rows));
    html.push_str("\n</section>\n");

    html.push_str(
        "<table>\n<thead><tr><th>IP</th><th>Sessions</th><th>Users</th><th>Location</th>\
         <th>Latitude</th><th>Longitude</th><th>Last seen</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        // write! into a String cannot fail
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td title=\"{}\">{}</td><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{}</td></tr>",
            escape_html(&row.ip),
            row.session_count,
            escape_html(&row.users),
            row.user_count,
            escape_html(&place(row)),
            row.latitude,
            row.longitude,
            format_ms(row.last_seen_ms)
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html.push_str(FOOTER);
    html
}

/// Page shown before anything has been geolocated.
pub fn render_no_data(stats: &StoreStats) -> String {
    let mut html = header("Shared IP Addresses Heatmap");
    html.push_str(&stats_panel(stats));
    html.push_str(
        "<p class=\"empty\">No geolocated IP addresses yet. \
         The collector fills this page as sessions are resolved.</p>\n",
    );
    html.push_str(FOOTER);
    html
}
