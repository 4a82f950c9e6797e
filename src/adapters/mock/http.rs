//! Mock HTTP client for testing.
//!
//! Returns canned responses keyed by URL and records every request it sees.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::{HttpClient, HttpError, Request, Response};

/// Canned outcome for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(Response),
    Error(HttpError),
}

/// Mock HTTP client for testing.
///
/// URLs match exactly first, then by the longest configured prefix, so a
/// response registered for `.../chat/history` also answers
/// `.../chat/history?id=1`.
///
/// # Example
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use linda::adapters::mock::MockHttpClient;
/// use linda::traits::{HttpClient, Method, Request};
///
/// let client = MockHttpClient::new();
/// client.set_json_response("http://api/x", 200, serde_json::json!({"code": 0}));
///
/// let response = client.execute(Request::new(Method::Get, "http://api/x")).await.unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, url: &str, response: Response) {
        lock(&self.responses).insert(url.to_string(), MockResponse::Success(response));
    }

    /// Answer `url` with a JSON body.
    pub fn set_json_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.set_response(url, Response::json_body(status, &body));
    }

    /// Fail requests to `url` at the transport level.
    pub fn set_error(&self, url: &str, error: HttpError) {
        lock(&self.responses).insert(url.to_string(), MockResponse::Error(error));
    }

    /// Outcome for URLs without a specific match.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    pub fn get_requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn response_for(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        drop(responses);

        prefix_match.or_else(|| lock(&self.default_response).clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: Request) -> Result<Response, HttpError> {
        let url = request.url.clone();
        lock(&self.requests).push(request);

        match self.response_for(&url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
