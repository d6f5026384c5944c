//! Request builders for every appliance operation.
//!
//! Each function returns the [`ApiRequest`] for one operation.  Together they
//! are the complete command vocabulary of the client; transports only ever see
//! requests built here.
//!
//! # Cursor dispatch table
//!
//! | Key                              | Verb   | Path                           | Body                            |
//! |----------------------------------|--------|--------------------------------|---------------------------------|
//! | Up / Down / Left / Right / Select | create | `1/keyboard/control-character` | `{"control_character": "up"}` … `"return"` |
//! | TextLeft / TextRight / TextSelect | create | `1/keyboard/text`              | `{"text": "z"}` / `"x"` / `"f"` |
//! | Exit                              | remove | `1/osd`                        | none                            |

use crate::domain::cursor::CursorKey;
use crate::domain::layout::LayoutId;
use crate::domain::mixer::MixerLevels;
use crate::protocol::codec::{self, ProtocolError};
use crate::protocol::paths;
use crate::protocol::request::ApiRequest;

/// What a cursor key turns into on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Post a keyboard control character.
    ControlCharacter(&'static str),
    /// Post literal keyboard text.
    Text(&'static str),
    /// Dismiss the on-screen display.
    DismissOsd,
}

/// Maps a key to its command.  Total: every key has exactly one command.
pub fn cursor_command(key: CursorKey) -> CursorCommand {
    match key {
        CursorKey::Up => CursorCommand::ControlCharacter("up"),
        CursorKey::Down => CursorCommand::ControlCharacter("down"),
        CursorKey::Left => CursorCommand::ControlCharacter("left"),
        CursorKey::Right => CursorCommand::ControlCharacter("right"),
        CursorKey::Select => CursorCommand::ControlCharacter("return"),
        CursorKey::TextLeft => CursorCommand::Text("z"),
        CursorKey::TextRight => CursorCommand::Text("x"),
        CursorKey::TextSelect => CursorCommand::Text("f"),
        CursorKey::Exit => CursorCommand::DismissOsd,
    }
}

/// `GET 1/layouts`
pub fn list_layouts() -> ApiRequest {
    ApiRequest::fetch(paths::LAYOUTS)
}

/// `GET 1/window-manager/layout`
pub fn active_layout() -> ApiRequest {
    ApiRequest::fetch(paths::ACTIVE_LAYOUT)
}

/// `PUT 1/window-manager/layout {"id": id}`
pub fn select_layout(id: LayoutId) -> Result<ApiRequest, ProtocolError> {
    Ok(ApiRequest::replace(
        paths::ACTIVE_LAYOUT,
        codec::encode_layout_ref(id)?,
    ))
}

/// `GET 1/audio-config`
pub fn mixer_levels() -> ApiRequest {
    ApiRequest::fetch(paths::AUDIO_CONFIG)
}

/// `PUT 1/audio-config {"mixed_hdmi_volumes": [...]}`
pub fn set_mixer_levels(levels: &MixerLevels) -> Result<ApiRequest, ProtocolError> {
    Ok(ApiRequest::replace(
        paths::AUDIO_CONFIG,
        codec::encode_mixer_levels(levels)?,
    ))
}

/// `POST 1/osd {"screen": name}`
pub fn show_screen(name: &str) -> Result<ApiRequest, ProtocolError> {
    Ok(ApiRequest::create(paths::OSD, codec::encode_osd_screen(name)?))
}

/// Builds the single request a cursor key produces.
pub fn cursor(key: CursorKey) -> Result<ApiRequest, ProtocolError> {
    let request = match cursor_command(key) {
        CursorCommand::ControlCharacter(c) => ApiRequest::create(
            paths::KEYBOARD_CONTROL_CHARACTER,
            codec::encode_control_character(c)?,
        ),
        CursorCommand::Text(t) => {
            ApiRequest::create(paths::KEYBOARD_TEXT, codec::encode_text(t)?)
        }
        CursorCommand::DismissOsd => ApiRequest::remove(paths::OSD),
    };
    Ok(request)
}
