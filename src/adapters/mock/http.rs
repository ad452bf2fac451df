//! Mock HTTP client for testing.
//!
//! Responses are registered per method and URL. Registering several
//! responses for the same route plays them in order, repeating the last one,
//! so tests can script a gateway whose data changes between polls.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method (GET or DELETE)
    pub method: String,
    pub url: String,
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a complete response
    Success(Response),
    /// Fail the request
    Error(HttpError),
    /// Stream these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Stream these chunks, then keep the body open forever
    StreamHold(Vec<Bytes>),
}

impl MockResponse {
    /// A response with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    /// A response with an empty body.
    pub fn empty(status: u16) -> Self {
        MockResponse::Success(Response::new(status, Bytes::new()))
    }

    /// SSE text split into one chunk per string.
    pub fn sse<I, S>(chunks: I, hold_open: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = chunks
            .into_iter()
            .map(|c| Bytes::from(c.into()))
            .collect();
        if hold_open {
            MockResponse::StreamHold(chunks)
        } else {
            MockResponse::Stream(chunks)
        }
    }
}

type Route = (String, String);

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.on_get(
///     "http://gw/api/v1/stats",
///     MockResponse::json(200, &serde_json::json!({"total": 0})),
/// );
/// let response = client.get("http://gw/api/v1/stats", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.request_count("GET", "http://gw/api/v1/stats"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Scripted responses by (method, url)
    routes: Arc<Mutex<HashMap<Route, VecDeque<MockResponse>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method url`.
    pub fn push_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry((method.to_uppercase(), url.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn on_get(&self, url: &str, response: MockResponse) {
        self.push_response("GET", url, response);
    }

    pub fn on_delete(&self, url: &str, response: MockResponse) {
        self.push_response("DELETE", url, response);
    }

    /// Replace every queued response for `method url`.
    pub fn set_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut routes = self.routes.lock().unwrap();
        routes.insert(
            (method.to_uppercase(), url.to_string()),
            VecDeque::from([response]),
        );
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, method: &str, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
        });
    }

    /// Next scripted response; the last one for a route repeats.
    fn next_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(method.to_string(), url.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn respond(&self, method: &str, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(method, url, headers);

        match self.next_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::StreamHold(_)) => Err(
                HttpError::Other("Stream response on non-stream request".to_string()),
            ),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.respond("GET", url, headers)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.respond("DELETE", url, headers)
    }

    async fn get_stream(&self, url: &str, headers: &Headers) -> Result<ByteStream, HttpError> {
        self.record_request("GET", url, headers);

        match self.next_response("GET", url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))))
            }
            Some(MockResponse::StreamHold(chunks)) => {
                use futures::StreamExt;
                let stream = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::pending());
                Ok(Box::pin(stream))
            }
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text().unwrap_or_default(),
                })
            }
            Some(MockResponse::Success(_)) => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for GET {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    const STATS: &str = "http://gw/api/v1/stats";

    #[tokio::test]
    async fn test_get_json_response() {
        let client = MockHttpClient::new();
        client.on_get(STATS, MockResponse::json(200, &serde_json::json!({"total": 2})));

        let response = client.get(STATS, &Headers::new()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text().unwrap(), r#"{"total":2}"#);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, STATS);
    }

    #[tokio::test]
    async fn test_responses_play_in_order_and_last_repeats() {
        let client = MockHttpClient::new();
        client.on_get(STATS, MockResponse::empty(500));
        client.on_get(STATS, MockResponse::empty(200));

        assert_eq!(client.get(STATS, &Headers::new()).await.unwrap().status, 500);
        assert_eq!(client.get(STATS, &Headers::new()).await.unwrap().status, 200);
        assert_eq!(client.get(STATS, &Headers::new()).await.unwrap().status, 200);
        assert_eq!(client.request_count("GET", STATS), 3);
    }

    #[tokio::test]
    async fn test_methods_are_routed_separately() {
        let client = MockHttpClient::new();
        let url = "http://gw/api/v1/emails/e1";
        client.on_delete(url, MockResponse::empty(204));

        assert!(client.get(url, &Headers::new()).await.is_err());
        assert_eq!(client.delete(url, &Headers::new()).await.unwrap().status, 204);
        assert_eq!(client.request_count("DELETE", url), 1);
        assert_eq!(client.request_count("GET", url), 1);
    }

    #[tokio::test]
    async fn test_stream_chunks() {
        let client = MockHttpClient::new();
        let url = "http://gw/api/v1/events";
        client.on_get(url, MockResponse::sse(["event: connected\n", "data: {}\n\n"], false));

        let mut stream = client.get_stream(url, &Headers::new()).await.unwrap();
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk.unwrap());
        }
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Bytes::from("event: connected\n"));
    }

    #[tokio::test]
    async fn test_stream_rejected_status() {
        let client = MockHttpClient::new();
        let url = "http://gw/api/v1/events";
        client.on_get(url, MockResponse::empty(503));

        let result = client.get_stream(url, &Headers::new()).await;
        assert!(matches!(
            result,
            Err(HttpError::ServerError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.get("http://gw/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[test]
    fn test_clear_requests() {
        let client = MockHttpClient::new();
        client.record_request("GET", STATS, &Headers::new());
        assert_eq!(client.get_requests().len(), 1);
        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
