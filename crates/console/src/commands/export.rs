//! CSV export of query logs.

use anyhow::{Context, Result};
use client::ApiClient;
use domain::{PageRequest, SortDir};

use crate::cli::ExportArgs;

pub async fn run(client: &ApiClient, args: ExportArgs) -> Result<()> {
    let request = PageRequest {
        page: 0,
        size: args.size.max(1),
        sort: Some(("executedAt".to_string(), SortDir::Desc)),
        filter: args.filter(),
    };

    // A one-shot user action: failure here is a hard error, not a status flag.
    let outcome = client
        .export_logs(&request, args.out.as_deref())
        .await
        .context("export failed")?;

    println!(
        "wrote {} bytes to {}",
        outcome.bytes,
        outcome.path.display()
    );
    Ok(())
}
