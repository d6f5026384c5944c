//! Controller configuration types.
//!
//! [`ControllerConfig`] is the single source of truth for runtime settings.
//! It can be built from CLI arguments and an optional TOML file (see
//! `infrastructure::config_file`) or from defaults in tests.
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! reads inside the domain) makes the controller easy to embed in tests and in
//! other host integrations.  The binary is responsible for populating it.

use std::time::Duration;

use wall_core::protocol::paths;

/// All runtime configuration for one appliance controller.
///
/// # Example
///
/// ```rust
/// use wallctl::domain::ControllerConfig;
///
/// let cfg = ControllerConfig::for_host("10.0.0.20");
/// assert_eq!(cfg.socket_url(), "ws://10.0.0.20/1/sockets");
/// assert_eq!(cfg.debug_host(), "10.0.0.20:8081");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Appliance host name or address, optionally with a port
    /// (`"192.168.1.40"`, `"wall.local:8080"`).
    pub host: String,

    /// When set, every command request is first mirrored to
    /// [`debug_host`](Self::debug_host) and its result discarded.
    pub debug: bool,

    /// Port of the diagnostic mirror on the same host.
    pub debug_port: u16,

    /// `Accept` header sent with every command request.
    pub accept: String,

    /// Per-request timeout applied by the HTTP transport adapter.
    ///
    /// The controller itself has no timeout surface; a request that exceeds
    /// this limit surfaces as an ordinary transport failure.
    pub request_timeout: Duration,
}

impl ControllerConfig {
    /// Defaults for `host`.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// `http://{host}/`
    pub fn rest_base(&self) -> String {
        paths::rest_url(&self.host, "")
    }

    /// `ws://{host}/1/sockets`
    pub fn socket_url(&self) -> String {
        paths::socket_url(&self.host)
    }

    /// `{host}:{debug_port}`
    pub fn debug_host(&self) -> String {
        paths::debug_host(&self.host, self.debug_port)
    }
}

impl Default for ControllerConfig {
    /// | Field           | Default              |
    /// |-----------------|----------------------|
    /// | host            | `127.0.0.1`          |
    /// | debug           | `false`              |
    /// | debug_port      | `8081`               |
    /// | accept          | `application/json`   |
    /// | request_timeout | 5 seconds            |
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            debug: false,
            debug_port: paths::DEBUG_MIRROR_PORT,
            accept: paths::ACCEPT_JSON.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_debug_is_off() {
        let cfg = ControllerConfig::default();
        assert!(!cfg.debug);
    }

    #[test]
    fn test_default_debug_port_is_8081() {
        assert_eq!(ControllerConfig::default().debug_port, 8081);
    }

    #[test]
    fn test_default_accept_is_json() {
        assert_eq!(ControllerConfig::default().accept, "application/json");
    }

    #[test]
    fn test_default_timeout_is_5s() {
        assert_eq!(
            ControllerConfig::default().request_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_socket_url_keeps_host_port() {
        // Arrange
        let cfg = ControllerConfig::for_host("wall.local:8080");

        // Act / Assert
        assert_eq!(cfg.socket_url(), "ws://wall.local:8080/1/sockets");
    }

    #[test]
    fn test_rest_base_ends_with_slash() {
        let cfg = ControllerConfig::for_host("10.0.0.20");
        assert_eq!(cfg.rest_base(), "http://10.0.0.20/");
    }

    #[test]
    fn test_debug_host_follows_debug_port() {
        let cfg = ControllerConfig {
            debug_port: 9000,
            ..ControllerConfig::for_host("10.0.0.5")
        };
        assert_eq!(cfg.debug_host(), "10.0.0.5:9000");
    }
}
