//! Mixer level cache.
//!
//! The appliance reports one signed volume level per HDMI input in a fixed
//! hardware channel order.  Position is the only channel identifier, so the
//! cache is always read and written as a whole sequence.

/// A single signed mixer level as reported by the appliance.
pub type MixerLevel = i16;

/// Ordered mixer levels, one per hardware channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixerLevels(Vec<MixerLevel>);

impl MixerLevels {
    pub fn new(levels: Vec<MixerLevel>) -> Self {
        Self(levels)
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[MixerLevel] {
        &self.0
    }
}

impl From<Vec<MixerLevel>> for MixerLevels {
    fn from(levels: Vec<MixerLevel>) -> Self {
        Self(levels)
    }
}
