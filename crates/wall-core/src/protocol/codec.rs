//! JSON codec for appliance command payloads.
//!
//! Decoders turn a response body into a domain value and never touch client
//! state; a decode failure leaves the caller free to keep whatever it held
//! before.  Encoders produce the compact JSON body for a request.

use serde::Serialize;
use thiserror::Error;

use crate::domain::layout::{Layout, LayoutId};
use crate::domain::mixer::MixerLevels;
use crate::protocol::messages::{
    AudioConfig, ControlCharacter, LayoutRecord, LayoutRef, OsdScreen, TextInput,
};

/// Errors that can occur during payload encoding or decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The response body is not valid JSON of the expected shape, or a field
    /// is missing or out of range.
    #[error("malformed {what} payload: {source}")]
    MalformedPayload {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be serialized.
    #[error("failed to encode {what} payload: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn decode<'a, T: serde::Deserialize<'a>>(what: &'static str, body: &'a str) -> Result<T, ProtocolError> {
    serde_json::from_str(body).map_err(|source| ProtocolError::MalformedPayload { what, source })
}

fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<String, ProtocolError> {
    serde_json::to_string(value).map_err(|source| ProtocolError::Encode { what, source })
}

// ── Decoders ──────────────────────────────────────────────────────────────────

/// Decodes the layout collection, preserving appliance order.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if the body is not an array of
/// `{id, name}` records.  No partial list is ever returned.
///
/// # Examples
///
/// ```rust
/// use wall_core::protocol::codec::decode_layouts;
///
/// let layouts = decode_layouts(r#"[{"id":5,"name":"Main"},{"id":7,"name":"Alt"}]"#).unwrap();
/// assert_eq!(layouts[1].id, 7);
/// assert_eq!(layouts[1].name, "Alt");
/// ```
pub fn decode_layouts(body: &str) -> Result<Vec<Layout>, ProtocolError> {
    let records: Vec<LayoutRecord> = decode("layout list", body)?;
    Ok(records.into_iter().map(Layout::from).collect())
}

/// Decodes the active-layout resource and returns the appliance layout id.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if the body has no integer `id`.
pub fn decode_active_layout(body: &str) -> Result<LayoutId, ProtocolError> {
    let layout: LayoutRef = decode("active layout", body)?;
    Ok(layout.id)
}

/// Decodes `mixed_hdmi_volumes` from the audio configuration resource.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if the field is missing, is not
/// an array, or holds a value that does not fit a signed 16-bit level.
pub fn decode_mixer_levels(body: &str) -> Result<MixerLevels, ProtocolError> {
    let config: AudioConfig = decode("audio config", body)?;
    Ok(MixerLevels::from(config.mixed_hdmi_volumes))
}

// ── Encoders ──────────────────────────────────────────────────────────────────

/// Encodes `{"id": id}`.
pub fn encode_layout_ref(id: LayoutId) -> Result<String, ProtocolError> {
    encode("layout reference", &LayoutRef { id })
}

/// Encodes `{"mixed_hdmi_volumes": [...]}` in channel order.
///
/// # Examples
///
/// ```rust
/// use wall_core::protocol::codec::encode_mixer_levels;
/// use wall_core::MixerLevels;
///
/// let body = encode_mixer_levels(&MixerLevels::from(vec![10, 20, 30])).unwrap();
/// assert_eq!(body, r#"{"mixed_hdmi_volumes":[10,20,30]}"#);
/// ```
pub fn encode_mixer_levels(levels: &MixerLevels) -> Result<String, ProtocolError> {
    encode(
        "audio config",
        &AudioConfig {
            mixed_hdmi_volumes: levels.as_slice().to_vec(),
        },
    )
}

/// Encodes `{"screen": name}`.
pub fn encode_osd_screen(name: &str) -> Result<String, ProtocolError> {
    encode(
        "osd screen",
        &OsdScreen {
            screen: name.to_string(),
        },
    )
}

/// Encodes `{"control_character": character}`.
pub fn encode_control_character(character: &str) -> Result<String, ProtocolError> {
    encode(
        "control character",
        &ControlCharacter {
            control_character: character.to_string(),
        },
    )
}

/// Encodes `{"text": text}`.
pub fn encode_text(text: &str) -> Result<String, ProtocolError> {
    encode(
        "keyboard text",
        &TextInput {
            text: text.to_string(),
        },
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
