//! Plain-text rendering of pages and statistics.

use client::{FetchStatus, PageView, UsageStats};
use domain::{DateRange, DetectionEvent, LiveEvent, QueryLogRow};

const SQL_PREVIEW_WIDTH: usize = 60;
const BAR_WIDTH: usize = 32;

pub fn print_log_page(view: &PageView<QueryLogRow>) {
    println!(
        "{:<19}  {:<20}  {:<8}  {:>8}  SQL",
        "TIME", "USER", "STATUS", "ROWS"
    );
    if view.rows.is_empty() {
        println!("  (no logs)");
    }
    for row in &view.rows {
        println!(
            "{:<19}  {:<20}  {:<8}  {:>8}  {}",
            row.executed_at.format("%Y-%m-%d %H:%M:%S"),
            truncate(row.user_id.as_deref().unwrap_or("-"), 20),
            row.status,
            row.return_rows,
            truncate(row.sql_summary.as_deref().unwrap_or(""), SQL_PREVIEW_WIDTH),
        );
        if view.expanded.as_deref() == Some(row.id.as_str()) {
            println!("    id:      {}", row.id);
            println!(
                "    summary: {}",
                row.sql_summary.as_deref().unwrap_or("(none)")
            );
            println!("    raw:     {}", row.sql_raw.as_deref().unwrap_or("(none)"));
        }
    }
    print_footer(view.page, view.total_pages, view.total_elements, &view.status);
}

pub fn print_event_page(view: &PageView<DetectionEvent>) {
    println!(
        "{:<19}  {:<20}  {:<8}  {:<8}  SQL",
        "TIME", "USER", "TYPE", "SEVERITY"
    );
    if view.rows.is_empty() {
        println!("  (no events)");
    }
    for event in &view.rows {
        println!(
            "{:<19}  {:<20}  {:<8}  {:<8}  {}",
            event.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            truncate(event.user_id.as_deref().unwrap_or("-"), 20),
            event.event_type,
            event.severity,
            truncate(event.sql_preview.as_deref().unwrap_or(""), SQL_PREVIEW_WIDTH),
        );
    }
    print_footer(view.page, view.total_pages, view.total_elements, &view.status);
}

pub fn print_usage_stats(stats: &UsageStats, range: &DateRange) {
    let from = range
        .from
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    let to = range
        .to
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("Usage {} .. {}", from, to);
    println!(
        "total queries: {}   top user: {}   peak hour: {}",
        stats.total(),
        stats
            .top_user()
            .map(|b| b.user_id.clone())
            .unwrap_or_else(|| "-".to_string()),
        stats
            .peak_hour()
            .map(|b| b.hour_label.clone())
            .unwrap_or_else(|| "-".to_string()),
    );

    println!("\nTop users");
    let max = stats.by_user.iter().map(|b| b.count).max().unwrap_or(0);
    if stats.by_user.is_empty() {
        println!("  (none)");
    }
    for bucket in &stats.by_user {
        println!(
            "  {:<24} {:>7}  {}",
            truncate(&bucket.user_id, 24),
            bucket.count,
            bar(bucket.count, max),
        );
    }

    println!("\nQueries per hour");
    let max = stats.by_hour.iter().map(|b| b.count).max().unwrap_or(0);
    for bucket in &stats.by_hour {
        println!(
            "  {} {:>7}  {}",
            bucket.hour_label,
            bucket.count,
            bar(bucket.count, max),
        );
    }

    if let Some(error) = &stats.error {
        println!("\nnote: {}", error);
    }
}

pub fn live_event_line(event: &LiveEvent) -> String {
    format!(
        "{}  {:<8}  {:<8}  {:<20}  {}",
        event.occurred_at.format("%Y-%m-%d %H:%M:%S"),
        event.kind,
        event.severity,
        truncate(
            event
                .user_email
                .as_deref()
                .or(event.user_id.as_deref())
                .unwrap_or("-"),
            20
        ),
        truncate(event.sql_raw.as_deref().unwrap_or(""), SQL_PREVIEW_WIDTH),
    )
}

fn print_footer(page: u32, total_pages: u32, total_elements: u64, status: &FetchStatus) {
    let mut footer = format!(
        "page {} / {}  ({} total)",
        page + 1,
        total_pages.max(1),
        total_elements
    );
    if let FetchStatus::Error(error) = status {
        // Stale-but-valid rows stay on screen; the failure is a note.
        footer.push_str(&format!("  [refresh failed: {}]", error));
    }
    println!("{}", footer);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len)
}
