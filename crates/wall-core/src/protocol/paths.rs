//! Appliance resource paths and URL helpers.
//!
//! Paths are relative to `http://{host}/` and carry the API version as their
//! first segment.

/// Layout collection: `GET` returns `[{id, name}, ...]`.
pub const LAYOUTS: &str = "1/layouts";

/// The layout currently shown by the window manager: `{id}`.
pub const ACTIVE_LAYOUT: &str = "1/window-manager/layout";

/// Audio configuration, including `mixed_hdmi_volumes`.
pub const AUDIO_CONFIG: &str = "1/audio-config";

/// On-screen display.  `POST` shows a screen, `DELETE` dismisses it.
pub const OSD: &str = "1/osd";

/// Keyboard control characters (arrows, return).
pub const KEYBOARD_CONTROL_CHARACTER: &str = "1/keyboard/control-character";

/// Keyboard text input.
pub const KEYBOARD_TEXT: &str = "1/keyboard/text";

/// Persistent event socket.
pub const SOCKETS: &str = "1/sockets";

/// `Accept` header sent with every command request.
pub const ACCEPT_JSON: &str = "application/json";

/// Port of the diagnostic mirror that receives a copy of each request in
/// debug mode.
pub const DEBUG_MIRROR_PORT: u16 = 8081;

/// Builds the full command URL for `path` on `host`.
///
/// ```rust
/// use wall_core::protocol::paths::{rest_url, LAYOUTS};
///
/// assert_eq!(rest_url("10.0.0.2", LAYOUTS), "http://10.0.0.2/1/layouts");
/// ```
pub fn rest_url(host: &str, path: &str) -> String {
    format!("http://{host}/{}", path.trim_start_matches('/'))
}

/// Builds the persistent event socket URL for `host`.
///
/// ```rust
/// use wall_core::protocol::paths::socket_url;
///
/// assert_eq!(socket_url("wall.local"), "ws://wall.local/1/sockets");
/// ```
pub fn socket_url(host: &str) -> String {
    format!("ws://{host}/{SOCKETS}")
}

/// Returns the mirror host for `host`: the same address on `port`.
pub fn debug_host(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_joins_host_and_path() {
        assert_eq!(
            rest_url("192.168.1.50", ACTIVE_LAYOUT),
            "http://192.168.1.50/1/window-manager/layout"
        );
    }

    #[test]
    fn test_rest_url_tolerates_leading_slash() {
        assert_eq!(rest_url("h", "/1/osd"), "http://h/1/osd");
    }

    #[test]
    fn test_debug_host_uses_mirror_port() {
        assert_eq!(debug_host("10.1.1.1", DEBUG_MIRROR_PORT), "10.1.1.1:8081");
    }
}
