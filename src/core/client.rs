use crate::core::{PoiSource, QueryRequest, ResultPage};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_ENDPOINT: &str = "https://restapi.amap.com/v3/place/text";

/// Client for the AMap text-search endpoint. One GET per `search` call.
pub struct AmapClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AmapClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for AmapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmapClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl PoiSource for AmapClient {
    async fn search(&self, request: &QueryRequest) -> Result<ResultPage> {
        tracing::debug!(
            "📡 GET {} keywords={} city={} page={}",
            self.endpoint,
            request.keywords,
            request.city,
            request.page
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query_params(&self.api_key))
            .send()
            .await?;

        // HTTP 狀態碼不作判斷，以回應中的 status 欄位為準
        tracing::debug!("API response status: {}", response.status());

        let body: serde_json::Value = response.json().await?;
        ResultPage::from_value(body)
    }
}
