//! Query log endpoints: listing, summary, CSV export.

use domain::{DateRange, LogFilter, PageRequest, PageResponse, PageResult, QueryLogRow};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::header::HeaderMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::ClientError;
use crate::http::ApiClient;

/// Summary dimension of `GET /api/logs/summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryDimension {
    User,
    Hour,
}

impl std::fmt::Display for SummaryDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryDimension::User => write!(f, "user"),
            SummaryDimension::Hour => write!(f, "hour"),
        }
    }
}

/// Result of a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

impl ApiClient {
    /// `GET /api/logs`: one page of query logs under the given filters.
    pub async fn fetch_logs(
        &self,
        request: &PageRequest<LogFilter>,
    ) -> Result<PageResult<QueryLogRow>, ClientError> {
        let response = self
            .send(self.get("/api/logs").query(&request.query_pairs()))
            .await?;
        let body: PageResponse<QueryLogRow> = response.json().await?;
        Ok(body.into_result(request.page, request.size))
    }

    /// `GET /api/logs/summary`: raw server summary for one dimension.
    ///
    /// The body shape varies by deployment; decoding happens in
    /// [`crate::decode`].
    pub async fn fetch_log_summary(
        &self,
        dimension: SummaryDimension,
        range: &DateRange,
    ) -> Result<serde_json::Value, ClientError> {
        let mut pairs = vec![("by", dimension.to_string())];
        pairs.extend(range.query_pairs());
        let response = self.send(self.get("/api/logs/summary").query(&pairs)).await?;
        Ok(response.json().await?)
    }

    /// `GET /api/logs/export`: streams the CSV body to disk.
    ///
    /// Without an explicit output path the server's `Content-Disposition`
    /// filename is honored, falling back to a timestamped name.
    pub async fn export_logs(
        &self,
        request: &PageRequest<LogFilter>,
        out: Option<&Path>,
    ) -> Result<ExportOutcome, ClientError> {
        let mut response = self
            .send(self.get("/api/logs/export").query(&request.query_pairs()))
            .await?;

        let path = match out {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(
                attachment_filename(response.headers()).unwrap_or_else(default_export_name),
            ),
        };

        let mut file = tokio::fs::File::create(&path).await?;
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        file.flush().await?;

        info!(path = %path.display(), bytes, "exported query logs");
        Ok(ExportOutcome { path, bytes })
    }
}

#[async_trait::async_trait]
impl crate::controller::PageFetcher<QueryLogRow, LogFilter> for ApiClient {
    async fn fetch_page(
        &self,
        request: &PageRequest<LogFilter>,
    ) -> Result<PageResult<QueryLogRow>, ClientError> {
        self.fetch_logs(request).await
    }
}

/// Extracts the filename from a `Content-Disposition: attachment` header.
/// Only the final path component is kept.
fn attachment_filename(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let (_, value) = raw.split_once("filename=")?;
    let name = value
        .split(';')
        .next()
        .unwrap_or(value)
        .trim()
        .trim_matches('"');
    let name = Path::new(name).file_name()?.to_str()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn default_export_name() -> String {
    format!(
        "query_logs_{}.csv",
        chrono::Local::now().format("%Y-%m-%d-%H-%M-%S")
    )
}
