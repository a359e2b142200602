//! Value Codec for Display Transcoding
//!
//! Stored values travel as base64 text - that is the canonical storage
//! encoding for transport. The administrative UI offers two views of a
//! value:
//!
//! - `base64`: the canonical form, passed through unchanged
//! - `raw`: a best-effort decode into human-readable text
//!
//! Transcoding never changes the underlying stored bytes; a `raw` edit is
//! re-encoded to base64 before it is ever written. Decode failures are
//! display problems, not storage problems, so they degrade to a fixed
//! placeholder string instead of surfacing an error - the one deliberate
//! exception to the crate's fail-loudly policy.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Shown in place of a `raw` view when the stored text is not decodable.
pub const INVALID_BASE64_PLACEHOLDER: &str = "Not a valid base64 string";

/// A display-only transcoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// The canonical base64 storage form
    Base64,
    /// Best-effort decoded text
    Raw,
}

impl ViewType {
    /// The wire name of this view type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Base64 => "base64",
            ViewType::Raw => "raw",
        }
    }
}

impl std::str::FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(ViewType::Base64),
            "raw" => Ok(ViewType::Raw),
            other => Err(format!("unknown view type: {}", other)),
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a stored (base64) value for display under the given view.
///
/// For [`ViewType::Base64`] the stored representation is returned
/// unchanged. For [`ViewType::Raw`] the base64 text is decoded to UTF-8;
/// if either step fails the fixed placeholder is returned instead - never
/// an error.
pub fn to_display(view: ViewType, stored: &str) -> String {
    match view {
        ViewType::Base64 => stored.to_string(),
        ViewType::Raw => try_decode_to_text(stored),
    }
}

/// Converts a display value back into the canonical base64 storage form.
///
/// The inverse of [`to_display`]: `base64` passes through unchanged, `raw`
/// text is encoded. Round-trips are exact for every stored value that is
/// valid base64 of valid UTF-8; arbitrary malformed input has no inverse
/// (its display form is the placeholder).
pub fn from_display(view: ViewType, display: &str) -> String {
    match view {
        ViewType::Base64 => display.to_string(),
        ViewType::Raw => BASE64.encode(display.as_bytes()),
    }
}

/// Tries to decode base64 text into a UTF-8 string.
fn try_decode_to_text(stored: &str) -> String {
    match BASE64.decode(stored.as_bytes()) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => INVALID_BASE64_PLACEHOLDER.to_string(),
        },
        Err(_) => INVALID_BASE64_PLACEHOLDER.to_string(),
    }
}
