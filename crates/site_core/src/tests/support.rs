use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use content_client::ContentService;
use shared::{
    error::FetchError,
    protocol::{CollectionQuery, RawPayload, RecordPayload},
};

/// In-memory content service that replays canned answers and records writes.
pub struct StubService {
    base_url: String,
    reads: HashMap<String, Result<RawPayload, FetchError>>,
    submit_result: Result<(), FetchError>,
    pub queries: Mutex<Vec<(String, CollectionQuery)>>,
    pub submitted: Mutex<Vec<(String, RecordPayload)>>,
}

impl StubService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            reads: HashMap::new(),
            submit_result: Ok(()),
            queries: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_read(mut self, collection: &str, result: Result<RawPayload, FetchError>) -> Self {
        self.reads.insert(collection.to_string(), result);
        self
    }

    pub fn failing_writes(mut self, err: FetchError) -> Self {
        self.submit_result = Err(err);
        self
    }
}

#[async_trait]
impl ContentService for StubService {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_collection(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> Result<RawPayload, FetchError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push((collection.to_string(), query.clone()));
        self.reads
            .get(collection)
            .cloned()
            .unwrap_or(Err(FetchError::ServiceError { status_code: 404 }))
    }

    async fn submit_record(
        &self,
        collection: &str,
        payload: &RecordPayload,
    ) -> Result<(), FetchError> {
        self.submitted
            .lock()
            .expect("submitted lock")
            .push((collection.to_string(), payload.clone()));
        self.submit_result.clone()
    }
}
