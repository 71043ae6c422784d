//! Usage statistics.

use anyhow::Result;
use client::StatsAggregator;
use std::sync::Arc;

use crate::cli::stats_range;
use crate::render;

pub async fn run(
    client: Arc<client::ApiClient>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let range = stats_range(from, to);
    let stats = StatsAggregator::new(client).load(range).await;
    render::print_usage_stats(&stats, &range);
    Ok(())
}
