//! reqwest-backed webhook client.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{error, info};
use url::Url;

use super::Forwarder;
use crate::error::RelayError;

/// HTTP client bound to a single webhook URL.
///
/// No request timeout is configured: a call that never completes holds the
/// drainer in `Sending` until the process stops.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: Url) -> Result<Self, RelayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RelayError::Client(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Forwarder for WebhookClient {
    async fn forward(&self, payload: &Value) -> Result<u16, RelayError> {
        let body = serde_json::to_vec(payload).map_err(RelayError::transport)?;

        info!(
            url = %self.url,
            body_length = body.len(),
            "webhook_request_starting"
        );

        let request = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        match request.send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();

                info!(
                    url = %self.url,
                    status_code = status,
                    is_success = resp.status().is_success(),
                    "webhook_request_complete"
                );

                Ok(status)
            }
            Err(e) => {
                if e.is_connect() {
                    error!(url = %self.url, error = %e, "webhook_request_connect_error");
                } else if e.is_timeout() {
                    error!(url = %self.url, error = %e, "webhook_request_timeout");
                } else {
                    error!(url = %self.url, error = %e, "webhook_request_error");
                }
                Err(RelayError::transport(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer, route: &str) -> WebhookClient {
        let url = Url::parse(&format!("{}{}", server.uri(), route)).unwrap();
        WebhookClient::new(url).unwrap()
    }

    #[tokio::test]
    async fn test_forward_posts_json_payload() {
        let server = MockServer::start().await;
        let payload = json!({"api_key": "abc", "field1": 21.5});

        Mock::given(method("POST"))
            .and(path("/update.json"))
            .and(header("content-type", "application/json"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "/update.json");
        let status = client.forward(&payload).await.unwrap();

        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_forward_passes_through_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server, "/");
        let status = client.forward(&json!([1, 2, 3])).await.unwrap();

        assert_eq!(status, 429);
    }

    #[tokio::test]
    async fn test_forward_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        let client = WebhookClient::new(url).unwrap();

        let err = client.forward(&json!({"id": 1})).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}
