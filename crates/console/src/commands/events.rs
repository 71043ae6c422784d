//! Detection event listing, one-shot or watched.

use anyhow::Result;
use client::{ControllerOptions, PagedQueryController, PagerState};
use domain::SortDir;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::EventsArgs;
use crate::config::Config;
use crate::render;

/// Events are served newest-first; the listing has no sortable columns.
const EVENT_SORT_FIELD: &str = "occurredAt";

pub async fn run(client: Arc<client::ApiClient>, config: &Config, args: EventsArgs) -> Result<()> {
    let state = PagerState::new(
        args.filter(),
        EVENT_SORT_FIELD,
        SortDir::Desc,
        args.size.max(1),
    );
    let options = ControllerOptions {
        debounce: Duration::from_millis(config.refresh.debounce_ms),
        poll_interval: Duration::from_secs(config.refresh.poll_interval_secs),
        auto_refresh: args.watch,
    };
    let mut controller = PagedQueryController::new(client, state, options);

    controller.fetch_page(args.page).await;
    render::print_event_page(&controller.view());

    if args.watch {
        let mut version = controller.subscribe();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = version.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    render::print_event_page(&controller.view());
                }
            }
        }
    }

    controller.close();
    Ok(())
}
