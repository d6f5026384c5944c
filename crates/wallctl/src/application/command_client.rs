//! Command client: one request/response cycle per call.
//!
//! [`CommandClient`] sends an [`ApiRequest`] to the appliance through an
//! [`HttpTransport`] and returns the response body.  It knows nothing about
//! layouts or mixers; the device controller builds the requests.
//!
//! # Debug mirror
//!
//! An optional [`RequestObserver`] sees every request before the primary
//! dispatch.  [`MirrorObserver`] uses this to send a copy of each request to
//! the diagnostic port on the same host.  The observer cannot fail the call:
//! it returns nothing, and whatever the mirror answers is logged and dropped.
//!
//! # Errors
//!
//! Transport failures come back as [`CommandError`], which records the verb
//! and path.  Nothing is retried.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use wall_core::protocol::paths;
use wall_core::{ApiRequest, Verb};

/// HTTP failures reported by a transport adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (refused, timed out, reset).
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The appliance answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
}

/// Performs one request/response cycle against `host`.
///
/// The production implementation is
/// [`crate::infrastructure::http::ReqwestTransport`].  Timeouts are the
/// transport's business; a request that times out is a [`TransportError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` to `host` with the given `Accept` header and returns
    /// the response body as text.
    async fn dispatch(
        &self,
        host: &str,
        request: &ApiRequest,
        accept: &str,
    ) -> Result<String, TransportError>;
}

/// Sees every request before it is sent to the appliance.
#[async_trait]
pub trait RequestObserver: Send + Sync {
    async fn observe(&self, request: &ApiRequest);
}

/// Mirrors each request to the diagnostic host and discards the outcome.
pub struct MirrorObserver {
    transport: Arc<dyn HttpTransport>,
    debug_host: String,
    accept: String,
}

impl MirrorObserver {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        debug_host: impl Into<String>,
        accept: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            debug_host: debug_host.into(),
            accept: accept.into(),
        }
    }
}

#[async_trait]
impl RequestObserver for MirrorObserver {
    async fn observe(&self, request: &ApiRequest) {
        match self
            .transport
            .dispatch(&self.debug_host, request, &self.accept)
            .await
        {
            Ok(body) => debug!(
                "mirror {} {}: {}",
                request.verb,
                paths::rest_url(&self.debug_host, &request.path),
                body
            ),
            Err(e) => debug!("mirror {} failed: {e}", request.verb),
        }
    }
}

/// A command that did not produce a response body.
#[derive(Debug, Error)]
#[error("{verb} {path} failed: {source}")]
pub struct CommandError {
    pub verb: Verb,
    pub path: String,
    #[source]
    pub source: TransportError,
}

/// Issues verb calls against one appliance host.
pub struct CommandClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    accept: String,
    /// Swappable through `&self` so a shared controller can toggle mirroring.
    observer: RwLock<Option<Arc<dyn RequestObserver>>>,
}

impl CommandClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        host: impl Into<String>,
        accept: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            host: host.into(),
            accept: accept.into(),
            observer: RwLock::new(None),
        }
    }

    /// Installs or removes the request observer.  Requests already past
    /// the observer step are not affected.
    pub fn set_observer(&self, observer: Option<Arc<dyn RequestObserver>>) {
        *self.observer.write().unwrap_or_else(PoisonError::into_inner) = observer;
    }

    pub fn has_observer(&self) -> bool {
        self.current_observer().is_some()
    }

    fn current_observer(&self) -> Option<Arc<dyn RequestObserver>> {
        self.observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    /// `GET path`
    pub async fn fetch(&self, path: &str) -> Result<String, CommandError> {
        self.execute(&ApiRequest::fetch(path)).await
    }

    /// `PUT path body`
    pub async fn replace(&self, path: &str, body: &str) -> Result<String, CommandError> {
        self.execute(&ApiRequest::replace(path, body)).await
    }

    /// `POST path body`
    pub async fn create(&self, path: &str, body: &str) -> Result<String, CommandError> {
        self.execute(&ApiRequest::create(path, body)).await
    }

    /// `DELETE path`
    pub async fn remove(&self, path: &str) -> Result<String, CommandError> {
        self.execute(&ApiRequest::remove(path)).await
    }

    /// Runs the observer (if any), then dispatches `request` to the appliance.
    pub async fn execute(&self, request: &ApiRequest) -> Result<String, CommandError> {
        // Clone out of the lock; the guard must not live across the await.
        let observer = self.current_observer();
        if let Some(observer) = observer {
            observer.observe(request).await;
        }

        let url = paths::rest_url(&self.host, &request.path);
        match &request.body {
            Some(body) => debug!("{} {url} {body}", request.verb),
            None => debug!("{} {url}", request.verb),
        }

        self.transport
            .dispatch(&self.host, request, &self.accept)
            .await
            .map_err(|source| {
                warn!("{} {url} failed: {source}", request.verb);
                CommandError {
                    verb: request.verb,
                    path: request.path.clone(),
                    source,
                }
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn refused(url: &str) -> TransportError {
        TransportError::Request {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body_from_host() {
        // Arrange
        let mut transport = MockHttpTransport::new();
        transport
            .expect_dispatch()
            .withf(|host, request, accept| {
                host == "wall"
                    && *request == ApiRequest::fetch("1/layouts")
                    && accept == "application/json"
            })
            .times(1)
            .returning(|_, _, _| Ok("[]".to_string()));
        let client = CommandClient::new(Arc::new(transport), "wall", "application/json");

        // Act
        let body = client.fetch("1/layouts").await.unwrap();

        // Assert
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_each_verb_builds_matching_request() {
        let mut transport = MockHttpTransport::new();
        let mut seq = Sequence::new();
        for expected in [
            ApiRequest::replace("1/audio-config", "{}"),
            ApiRequest::create("1/osd", r#"{"screen":"menu"}"#),
            ApiRequest::remove("1/osd"),
        ] {
            transport
                .expect_dispatch()
                .withf(move |_, request, _| *request == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _| Ok(String::new()));
        }
        let client = CommandClient::new(Arc::new(transport), "wall", "application/json");

        client.replace("1/audio-config", "{}").await.unwrap();
        client.create("1/osd", r#"{"screen":"menu"}"#).await.unwrap();
        client.remove("1/osd").await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_command_error() {
        // Arrange
        let mut transport = MockHttpTransport::new();
        transport
            .expect_dispatch()
            .returning(|_, _, _| Err(refused("http://wall/1/osd")));
        let client = CommandClient::new(Arc::new(transport), "wall", "application/json");

        // Act
        let err = client.remove("1/osd").await.unwrap_err();

        // Assert
        assert_eq!(err.verb, Verb::Remove);
        assert_eq!(err.path, "1/osd");
        assert!(matches!(err.source, TransportError::Request { .. }));
    }

    #[tokio::test]
    async fn test_mirror_sees_same_request_before_primary() {
        // Arrange: mirror on wall:8081 answers first, then the appliance
        let mut transport = MockHttpTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_dispatch()
            .with(
                eq("wall:8081"),
                eq(ApiRequest::fetch("1/window-manager/layout")),
                eq("application/json"),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok("mirror".to_string()));
        transport
            .expect_dispatch()
            .with(
                eq("wall"),
                eq(ApiRequest::fetch("1/window-manager/layout")),
                eq("application/json"),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(r#"{"id":7}"#.to_string()));
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let client = CommandClient::new(Arc::clone(&transport), "wall", "application/json");
        client.set_observer(Some(Arc::new(MirrorObserver::new(
            transport,
            "wall:8081",
            "application/json",
        ))));

        // Act
        let body = client.fetch("1/window-manager/layout").await.unwrap();

        // Assert: the primary body is returned, not the mirror's
        assert_eq!(body, r#"{"id":7}"#);
    }

    #[tokio::test]
    async fn test_mirror_failure_does_not_affect_primary() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_dispatch()
            .with(eq("wall:8081"), mockall::predicate::always(), mockall::predicate::always())
            .returning(|_, _, _| Err(refused("http://wall:8081/1/osd")));
        transport
            .expect_dispatch()
            .with(eq("wall"), mockall::predicate::always(), mockall::predicate::always())
            .returning(|_, _, _| Ok("ok".to_string()));
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let client = CommandClient::new(Arc::clone(&transport), "wall", "application/json");
        client.set_observer(Some(Arc::new(MirrorObserver::new(
            transport,
            "wall:8081",
            "application/json",
        ))));

        assert_eq!(client.remove("1/osd").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_removing_observer_stops_mirroring() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_dispatch()
            .with(eq("wall"), mockall::predicate::always(), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(String::new()));
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        let client = CommandClient::new(Arc::clone(&transport), "wall", "application/json");
        client.set_observer(Some(Arc::new(MirrorObserver::new(
            Arc::clone(&transport),
            "wall:8081",
            "application/json",
        ))));

        client.set_observer(None);

        assert!(!client.has_observer());
        client.fetch("1/layouts").await.unwrap();
    }
}
