//! Detection event endpoints.

use domain::{DetectionEvent, EventDetail, EventFilter, PageRequest, PageResponse, PageResult};

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// `GET /api/events`: one page of detection events.
    pub async fn fetch_events(
        &self,
        request: &PageRequest<EventFilter>,
    ) -> Result<PageResult<DetectionEvent>, ClientError> {
        let response = self
            .send(self.get("/api/events").query(&request.query_pairs()))
            .await?;
        let body: PageResponse<DetectionEvent> = response.json().await?;
        Ok(body.into_result(request.page, request.size))
    }

    /// `GET /api/events/{id}`: event detail with its query-log snapshot.
    /// Returns `None` for an unknown id.
    pub async fn fetch_event_detail(&self, id: &str) -> Result<Option<EventDetail>, ClientError> {
        match self.send(self.get(&format!("/api/events/{}", id))).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ClientError::Api(failure)) if failure.status == 404 => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait::async_trait]
impl crate::controller::PageFetcher<DetectionEvent, EventFilter> for ApiClient {
    async fn fetch_page(
        &self,
        request: &PageRequest<EventFilter>,
    ) -> Result<PageResult<DetectionEvent>, ClientError> {
        self.fetch_events(request).await
    }
}
