use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use shared::{
    error::FetchError,
    protocol::{CollectionQuery, Envelope, RawPayload, RecordPayload},
};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// Where the content service lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentServiceConfig {
    base_url: String,
    api_token: Option<String>,
}

impl ContentServiceConfig {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let api_token = api_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        Self {
            base_url,
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/api/{}", self.base_url, collection.trim_matches('/'))
    }
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Base address that relative media paths in payloads are resolved against.
    fn base_url(&self) -> &str;

    async fn fetch_collection(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> Result<RawPayload, FetchError>;

    async fn submit_record(
        &self,
        collection: &str,
        payload: &RecordPayload,
    ) -> Result<(), FetchError>;
}

/// HTTP client for the headless CMS. Never retries and never caches.
pub struct ContentClient {
    http: Client,
    config: ContentServiceConfig,
}

impl ContentClient {
    pub fn new(config: ContentServiceConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: ContentServiceConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ContentServiceConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ContentService for ContentClient {
    fn base_url(&self) -> &str {
        self.config.base_url()
    }

    async fn fetch_collection(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> Result<RawPayload, FetchError> {
        let url = self.config.collection_url(collection);
        let request = self.http.get(&url).query(&query.query_pairs());
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| transport_failure(collection, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                collection,
                status = status.as_u16(),
                "content: read rejected by service"
            );
            return Err(FetchError::ServiceError {
                status_code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_failure(collection, e))?;
        let payload: RawPayload = serde_json::from_slice(&body).map_err(|e| {
            warn!(collection, error = %e, "content: response body is not JSON");
            FetchError::malformed(e.to_string())
        })?;
        debug!(collection, bytes = body.len(), "content: collection fetched");
        Ok(payload)
    }

    async fn submit_record(
        &self,
        collection: &str,
        payload: &RecordPayload,
    ) -> Result<(), FetchError> {
        let url = self.config.collection_url(collection);
        let request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&Envelope::new(payload));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| transport_failure(collection, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                collection,
                status = status.as_u16(),
                "content: write rejected by service"
            );
            return Err(FetchError::ServiceError {
                status_code: status.as_u16(),
            });
        }
        debug!(collection, "content: record submitted");
        Ok(())
    }
}

fn transport_failure(collection: &str, error: reqwest::Error) -> FetchError {
    warn!(collection, %error, "content: transport failure");
    FetchError::network(error.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
