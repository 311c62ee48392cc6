//! Site and schema payloads carried through the lists.

use serde::{Deserialize, Serialize};

/// Password derivation hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMethod {
    /// Keccak sponge.
    #[default]
    Keccak,
    /// Skein.
    Skein,
}

/// YubiKey challenge/response slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum YubikeySlot {
    /// Slot 1.
    One,
    /// Slot 2.
    Two,
}

impl TryFrom<u8> for YubikeySlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("invalid yubikey slot: {}", other)),
        }
    }
}

impl From<YubikeySlot> for u8 {
    fn from(slot: YubikeySlot) -> Self {
        match slot {
            YubikeySlot::One => 1,
            YubikeySlot::Two => 2,
        }
    }
}

/// Configuration for one site.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Name of the schema passwords are generated from.
    pub schema: String,
    /// Login name, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Hash used for derivation.
    #[serde(default)]
    pub method: HashMethod,
    /// Rotation counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<u32>,
    /// YubiKey slot mixed into derivation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yubikey_slot: Option<YubikeySlot>,
}

/// A password schema (template).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema definition as written in the config store.
    pub definition: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Length of a hex-encoded SHA-256 digest.
const HASHED_LABEL_LEN: usize = 64;

/// Heuristic for site names that were stored hashed.
///
/// Such entries are unreadable until a secret reveals their real names.
pub fn is_likely_hashed_label(label: &str) -> bool {
    label.len() == HASHED_LABEL_LEN
        && label
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
