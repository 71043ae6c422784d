//! Remote pagination model.
//!
//! The backend serves Spring-style pages (`{content, page, size,
//! totalElements, totalPages}`) but some deployments return a bare array.
//! Both shapes decode through [`PageResponse`] and normalize into
//! [`PageResult`].

use serde::{Deserialize, Serialize};

/// Sort direction for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDir::Asc => write!(f, "ASC"),
            SortDir::Desc => write!(f, "DESC"),
        }
    }
}

/// Resource-specific filter serializable into request query pairs.
///
/// Implementations must be deterministic: equal filters yield identical
/// pair sequences, so retried requests carry byte-identical parameters.
pub trait QueryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Row types with a stable unique id, used to track UI expansion state
/// across refetches.
pub trait Identified {
    fn row_id(&self) -> &str;
}

/// One immutable page request: filters, sort, page size and target page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    pub page: u32,
    pub size: u32,
    /// Sort as `(field, direction)`, serialized `sort=<field>,<DIR>`.
    pub sort: Option<(String, SortDir)>,
    pub filter: F,
}

impl<F: QueryFilter> PageRequest<F> {
    /// Full query-pair list for this request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filter.query_pairs();
        if let Some((field, dir)) = &self.sort {
            pairs.push(("sort", format!("{},{}", field, dir)));
        }
        pairs.push(("size", self.size.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// Wrapped page envelope with every scalar optional; missing fields fall
/// back to the request's own values during normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageEnvelope<T> {
    #[serde(default)]
    pub content: Option<Vec<T>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Raw page response: either a bare array or a wrapped envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageResponse<T> {
    Bare(Vec<T>),
    Paged(PageEnvelope<T>),
}

/// Normalized page of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Normalizes into a [`PageResult`].
    ///
    /// A bare array is a single full page. A wrapped envelope keeps its own
    /// values where present and falls back to the requested page/size
    /// otherwise.
    pub fn into_result(self, requested_page: u32, requested_size: u32) -> PageResult<T> {
        match self {
            PageResponse::Bare(rows) => PageResult {
                page: 0,
                size: rows.len() as u32,
                total_elements: rows.len() as u64,
                total_pages: 1,
                content: rows,
            },
            PageResponse::Paged(envelope) => {
                let content = envelope.content.unwrap_or_default();
                PageResult {
                    page: envelope.page.unwrap_or(requested_page),
                    size: envelope.size.unwrap_or(requested_size),
                    total_elements: envelope.total_elements.unwrap_or(content.len() as u64),
                    total_pages: envelope.total_pages.unwrap_or(1),
                    content,
                }
            }
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: 0,
            size: 0,
            total_elements: 0,
            total_pages: 1,
        }
    }
}
