//! HTTP transport for the command API, built on `reqwest`.
//!
//! One pooled [`reqwest::Client`] is shared by every request, including the
//! debug mirror.  The per-request timeout comes from
//! [`ControllerConfig::request_timeout`](crate::domain::ControllerConfig).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;
use wall_core::protocol::paths;
use wall_core::{ApiRequest, Verb};

use crate::application::command_client::{HttpTransport, TransportError};

/// [`HttpTransport`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn dispatch(
        &self,
        host: &str,
        request: &ApiRequest,
        accept: &str,
    ) -> Result<String, TransportError> {
        let url = paths::rest_url(host, &request.path);

        let builder = match request.verb {
            Verb::Fetch => self.client.get(&url),
            Verb::Replace => self.client.put(&url),
            Verb::Create => self.client.post(&url),
            Verb::Remove => self.client.delete(&url),
        };
        let builder = builder.header(ACCEPT, accept);
        let builder = match &request.body {
            Some(body) => builder
                .header(CONTENT_TYPE, paths::ACCEPT_JSON)
                .body(body.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| TransportError::Request {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| TransportError::Request {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        debug!("{} {url} -> {status} ({} bytes)", request.verb, body.len());

        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response and returns the raw request text.
    async fn one_shot(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        let task = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            raw
        });
        (host, task)
    }

    /// Reads the head and, when `Content-Length` is present, the whole body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn test_put_sends_method_headers_and_body() {
        // Arrange
        let (host, server) = one_shot("200 OK", "").await;
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let request = ApiRequest::replace("1/window-manager/layout", r#"{"id":7}"#);

        // Act
        let body = transport
            .dispatch(&host, &request, "application/json")
            .await
            .unwrap();

        // Assert
        assert_eq!(body, "");
        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("put /1/window-manager/layout http/1.1"));
        assert!(raw.contains("accept: application/json"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.ends_with(r#"{"id":7}"#));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_text() {
        let (host, _server) = one_shot("200 OK", r#"{"id":5}"#).await;
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();

        let body = transport
            .dispatch(&host, &ApiRequest::fetch("1/window-manager/layout"), "application/json")
            .await
            .unwrap();

        assert_eq!(body, r#"{"id":5}"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (host, _server) = one_shot("503 Service Unavailable", "busy").await;
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();

        let result = transport
            .dispatch(&host, &ApiRequest::remove("1/osd"), "application/json")
            .await;

        match result {
            Err(TransportError::Status { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_closed_port_is_a_request_error() {
        // Bind then drop to get a loopback port with no listener.
        let host = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();

        let result = transport
            .dispatch(&host, &ApiRequest::fetch("1/layouts"), "application/json")
            .await;

        assert!(matches!(result, Err(TransportError::Request { .. })));
    }
}
