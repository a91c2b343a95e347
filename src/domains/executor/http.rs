//! HTTP operation executor.
//!
//! Forwards each operation to a remote endpoint as
//! `POST {endpoint}/{service}/{operation}` with the JSON input as body.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::error::ExecutionError;
use super::request::{OperationExecutor, OperationRequest};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "Request-Id";

/// Executes operations on a remote endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpExecutor {
    /// Create an executor for `endpoint`, bounding every call by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ExecutionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecutionError::transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// The endpoint base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn operation_url(&self, request: &OperationRequest) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint, request.service, request.operation
        )
    }
}

#[async_trait]
impl OperationExecutor for HttpExecutor {
    #[instrument(skip_all, fields(service = %request.service, operation = %request.operation, request_id = %request.request_id))]
    async fn execute(&self, request: OperationRequest) -> Result<Value, ExecutionError> {
        let url = self.operation_url(&request);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, request.request_id.to_string())
            .json(&request.input)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutionError::Timeout(self.timeout)
                } else {
                    ExecutionError::transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ExecutionError::transport(e.to_string()))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!("Remote operation failed with HTTP {}: {}", status, body);
            return Err(ExecutionError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| ExecutionError::MalformedResult(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_url() {
        let executor = HttpExecutor::new("http://localhost:7243/endpoint/", Duration::from_secs(1))
            .unwrap();
        let request = OperationRequest::new("Greeter", "hello", Value::Null);
        assert_eq!(executor.endpoint(), "http://localhost:7243/endpoint");
        assert_eq!(
            executor.operation_url(&request),
            "http://localhost:7243/endpoint/Greeter/hello"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let executor = HttpExecutor::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = executor
            .execute(OperationRequest::new("Greeter", "hello", Value::Null))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Transport(_) | ExecutionError::Timeout(_)
        ));
    }

    #[cfg(feature = "http")]
    mod remote {
        use super::*;
        use axum::{
            Json, Router,
            extract::Path,
            http::{HeaderMap, StatusCode},
            routing::post,
        };
        use serde_json::json;

        async fn spawn_endpoint() -> String {
            async fn handle(
                Path((service, operation)): Path<(String, String)>,
                headers: HeaderMap,
                Json(input): Json<Value>,
            ) -> (StatusCode, Json<Value>) {
                match (service.as_str(), operation.as_str()) {
                    ("Greeter", "hello") => (
                        StatusCode::OK,
                        Json(json!({
                            "message": format!("Hello, {}", input["name"].as_str().unwrap_or("?")),
                            "requestId": headers
                                .get(REQUEST_ID_HEADER)
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or_default(),
                        })),
                    ),
                    _ => (StatusCode::NOT_FOUND, Json(json!({"error": "unknown operation"}))),
                }
            }

            let app = Router::new().route("/{service}/{operation}", post(handle));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}", addr)
        }

        #[tokio::test]
        async fn test_remote_success_forwards_request_id() {
            let endpoint = spawn_endpoint().await;
            let executor = HttpExecutor::new(endpoint, Duration::from_secs(5)).unwrap();
            let request = OperationRequest::new("Greeter", "hello", json!({"name": "World"}));
            let request_id = request.request_id.to_string();

            let result = executor.execute(request).await.unwrap();
            assert_eq!(result["message"], "Hello, World");
            assert_eq!(result["requestId"], request_id);
        }

        #[tokio::test]
        async fn test_remote_failure_status() {
            let endpoint = spawn_endpoint().await;
            let executor = HttpExecutor::new(endpoint, Duration::from_secs(5)).unwrap();
            let err = executor
                .execute(OperationRequest::new("Greeter", "missing", json!({})))
                .await
                .unwrap_err();
            match err {
                ExecutionError::Remote { status, body } => {
                    assert_eq!(status, 404);
                    assert!(body.contains("unknown operation"));
                }
                other => panic!("Expected Remote error, got {:?}", other),
            }
        }
    }
}
