//! Query log listing, one-shot or watched.

use anyhow::Result;
use client::{ControllerOptions, PagedQueryController, PagerState};
use domain::{LogSortField, SortDir};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::LogsArgs;
use crate::config::Config;
use crate::render;

pub async fn run(client: Arc<client::ApiClient>, config: &Config, args: LogsArgs) -> Result<()> {
    let sort_field: LogSortField = args.sort.into();
    let sort_dir: SortDir = args.dir.into();
    let state = PagerState::new(args.filter(), sort_field, sort_dir, args.size.max(1));
    let options = ControllerOptions {
        debounce: Duration::from_millis(config.refresh.debounce_ms),
        poll_interval: Duration::from_secs(config.refresh.poll_interval_secs),
        auto_refresh: args.watch,
    };
    let mut controller = PagedQueryController::new(client, state, options);
    if let Some(id) = &args.expand {
        controller.toggle_expanded(id);
    }

    controller.fetch_page(args.page).await;
    render::print_log_page(&controller.view());

    if args.watch {
        let mut version = controller.subscribe();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = version.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    render::print_log_page(&controller.view());
                }
            }
        }
    }

    controller.close();
    Ok(())
}
