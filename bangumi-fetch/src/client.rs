use tokio::time::Duration;

use crate::error::FetchError;
use crate::pager::PageSource;
use crate::settings::RemoteConfig;
use crate::types::PageEnvelope;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the paginated collection listing.
pub struct CatalogClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl CatalogClient {
    pub fn new(config: RemoteConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("bangumi-shelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, config))
    }

    /// Use a preconfigured `reqwest::Client` (custom proxy, TLS, timeouts).
    pub fn with_http(http: reqwest::Client, config: RemoteConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn query(&self, page: u32) -> [(&'static str, String); 5] {
        [
            ("userId", self.config.user_id.clone()),
            ("page", page.to_string()),
            ("pageSize", self.config.page_size.to_string()),
            ("subjectType", self.config.subject_type.to_string()),
            ("collectionType", self.config.collection_type.to_string()),
        ]
    }
}

impl PageSource for CatalogClient {
    fn page_size(&self) -> u32 {
        self.config.page_size
    }

    async fn fetch_page(&self, page: u32) -> Result<PageEnvelope, FetchError> {
        log::debug!("Requesting page {} from {}", page, self.config.api_url);

        let resp = self
            .http
            .get(&self.config.api_url)
            .query(&self.query(page))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        let envelope: PageEnvelope = serde_json::from_str(&text).map_err(|e| {
            log::debug!(
                "Unparseable page {}: {}",
                page,
                text.chars().take(200).collect::<String>()
            );
            FetchError::Json(e)
        })?;
        Ok(envelope)
    }
}
