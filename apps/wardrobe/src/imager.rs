//! # Imager Client
//!
//! Bridge to the external rendering service. The imager takes a figure
//! string plus rendering options as query parameters and answers with an
//! image.
//!
//! Failures are never retried:
//! - non-success status → `UpstreamRender` with a truncated body
//! - transport failure → `UpstreamUnavailable`

use wardrobe_core::primitives::DEFAULT_MAX_DIRECTION;
use wardrobe_core::{RenderRequest, WardrobeError};

/// Content type assumed when the imager does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// A rendered image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the imager.
#[derive(Clone)]
pub struct ImagerClient {
    http: reqwest::Client,
    base_url: String,
    max_direction: u8,
}

impl ImagerClient {
    /// Create a new client pointing at the imager base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim().to_string(),
            max_direction: DEFAULT_MAX_DIRECTION,
        }
    }

    /// Limit the rotation indices accepted for this imager.
    #[must_use]
    pub fn with_max_direction(mut self, max_direction: u8) -> Self {
        self.max_direction = max_direction;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn max_direction(&self) -> u8 {
        self.max_direction
    }

    /// Send a request and map transport failures.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, WardrobeError> {
        req.send()
            .await
            .map_err(|e| WardrobeError::UpstreamUnavailable(format!("{}: {e}", self.base_url)))
    }

    /// Check the status and collect the image body.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<RenderedImage, WardrobeError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "imager rejected render request");
            return Err(WardrobeError::upstream_render(status.as_u16(), &body));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| WardrobeError::UpstreamUnavailable(format!("{}: {e}", self.base_url)))?;

        Ok(RenderedImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    /// Render a figure.
    pub async fn render(&self, request: &RenderRequest) -> Result<RenderedImage, WardrobeError> {
        tracing::debug!(figure = %request.figure(), "forwarding render request");
        let req = self.http.get(&self.base_url).query(&request.query_pairs());
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}
