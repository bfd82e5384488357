use std::sync::Arc;
use std::time::Duration;

use burrow_core::ShortCode;
use burrow_redirector::Redirector;
use burrow_shortener::Shortener;
use tokio::time::Instant;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    base_url: String,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        public_base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            shortener,
            redirector,
            base_url: public_base_url.into(),
            request_timeout,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    /// Renders the public URL for `code`.
    pub fn short_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.base_url)
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}
