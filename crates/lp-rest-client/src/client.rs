// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main REST API client implementation

use lp_api_contract::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{RestClientError, RestClientResult};

/// Health endpoint body
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// REST API client for the live-poll service
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    pub fn new(base_url: Url) -> RestClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("lp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(Url::parse(base_url)?)
    }

    pub async fn health(&self) -> RestClientResult<HealthStatus> {
        self.get("/api/v1/healthz").await
    }

    pub async fn list_sessions(&self) -> RestClientResult<SessionListResponse> {
        self.get("/api/v1/sessions").await
    }

    pub async fn create_session(&self) -> RestClientResult<Session> {
        self.post_empty("/api/v1/sessions").await
    }

    pub async fn get_session(&self, key: &str) -> RestClientResult<Session> {
        self.get(&format!("/api/v1/sessions/{}", key)).await
    }

    /// End a session; participants polling it start receiving 404
    pub async fn end_session(&self, key: &str) -> RestClientResult<()> {
        let url = self.url(&format!("/api/v1/sessions/{}", key))?;
        let response = self.http_client.delete(url).send().await?;
        Self::expect_no_content(response).await
    }

    pub async fn join_session(&self, key: &str) -> RestClientResult<JoinSessionResponse> {
        self.post_empty(&format!("/api/v1/sessions/{}/join", key)).await
    }

    pub async fn lock_session(&self, key: &str) -> RestClientResult<Session> {
        self.post_empty(&format!("/api/v1/sessions/{}/lock", key)).await
    }

    pub async fn create_poll(
        &self,
        key: &str,
        request: &CreatePollRequest,
    ) -> RestClientResult<Session> {
        self.post(&format!("/api/v1/sessions/{}/polls", key), request).await
    }

    pub async fn close_poll(&self, key: &str) -> RestClientResult<Session> {
        self.post_empty(&format!("/api/v1/sessions/{}/polls/close", key)).await
    }

    pub async fn vote(
        &self,
        key: &str,
        user_id: &str,
        selected_options: &[String],
    ) -> RestClientResult<Session> {
        let request = VoteRequest {
            key: None,
            user_id: user_id.to_string(),
            selected_options: selected_options.to_vec(),
        };
        self.post(&format!("/api/v1/sessions/{}/votes", key), &request).await
    }

    pub async fn results(&self, key: &str) -> RestClientResult<PollResults> {
        self.get(&format!("/api/v1/sessions/{}/results", key)).await
    }

    pub async fn history(&self, key: &str) -> RestClientResult<PollHistoryResponse> {
        self.get(&format!("/api/v1/sessions/{}/history", key)).await
    }

    // Private helper methods

    fn url(&self, path: &str) -> RestClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::POST, path, None::<&()>).await
    }

    async fn request<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "Sending request");

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> RestClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(RestClientError::from)
        } else {
            Err(Self::error_from(status, text))
        }
    }

    async fn expect_no_content(response: Response) -> RestClientResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(Self::error_from(status, text))
    }

    fn error_from(status: reqwest::StatusCode, text: String) -> RestClientError {
        match serde_json::from_str::<ProblemDetails>(&text) {
            Ok(details) => RestClientError::ServerError { status, details },
            Err(_) => RestClientError::UnexpectedResponse { status, body: text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned response and return the base URL
    async fn canned(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
             connection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            RestClient::from_url("not a url"),
            Err(RestClientError::Url(_))
        ));
    }

    #[tokio::test]
    async fn problem_details_become_server_error() {
        let base = canned(
            "404 Not Found",
            r#"{"type":"https://docs.example.com/errors/not-found","title":"Session Not Found","status":404,"detail":"Session not found: 123456","error":"Session not found"}"#,
        )
        .await;
        let client = RestClient::from_url(&base).unwrap();

        let err = client.get_session("123456").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.is_session_not_found());
        assert_eq!(err.message(), "Session not found: 123456");
        match err {
            RestClientError::ServerError { details, .. } => {
                assert_eq!(details.error.as_deref(), Some("Session not found"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_errors_are_kept_verbatim() {
        let base = canned("502 Bad Gateway", "upstream down").await;
        let client = RestClient::from_url(&base).unwrap();

        let err = client.list_sessions().await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_GATEWAY));
        assert!(matches!(
            err,
            RestClientError::UnexpectedResponse { ref body, .. } if body == "upstream down"
        ));
    }

    #[tokio::test]
    async fn success_body_is_decoded() {
        let base = canned(
            "200 OK",
            r#"{"key":"123456","locked":false,"users":{},"currentPoll":null,"pollHistory":[],"createdAt":"2025-01-01T00:00:00Z"}"#,
        )
        .await;
        let client = RestClient::from_url(&base).unwrap();

        let session = client.get_session("123456").await.unwrap();
        assert_eq!(session.key, "123456");
        assert!(session.current_poll.is_none());
    }
}
