//! JSON payload types for the appliance command API.
//!
//! Each struct mirrors one request or response body.  Unknown fields in
//! responses are ignored, so appliance firmware can add fields without
//! breaking the client.
//!
//! ```json
//! GET  1/layouts                  → [{"id":5,"name":"Main"},{"id":7,"name":"Alt"}]
//! GET  1/window-manager/layout    → {"id":7}
//! PUT  1/window-manager/layout    ← {"id":7}
//! GET  1/audio-config             → {"mixed_hdmi_volumes":[10,20,30], ...}
//! PUT  1/audio-config             ← {"mixed_hdmi_volumes":[10,20,30]}
//! POST 1/osd                      ← {"screen":"help"}
//! POST 1/keyboard/control-character ← {"control_character":"up"}
//! POST 1/keyboard/text            ← {"text":"z"}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::layout::{Layout, LayoutId};
use crate::domain::mixer::MixerLevel;

/// One entry of the layout collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub id: LayoutId,
    /// Some firmware omits the name of unnamed layouts.
    #[serde(default)]
    pub name: String,
}

impl From<LayoutRecord> for Layout {
    fn from(record: LayoutRecord) -> Self {
        Layout {
            id: record.id,
            name: record.name,
        }
    }
}

/// Reference to a layout by id, used to read and set the active layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRef {
    pub id: LayoutId,
}

/// The mixer portion of the audio configuration resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub mixed_hdmi_volumes: Vec<MixerLevel>,
}

/// Request to show a named OSD screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsdScreen {
    pub screen: String,
}

/// A keyboard control character such as `"up"` or `"return"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCharacter {
    pub control_character: String,
}

/// Literal keyboard text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub text: String,
}
