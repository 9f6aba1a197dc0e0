//! Card schema detection.

use serde::Serialize;
use serde_json::Value;

/// Name of the schema-version marker field.
pub const SPEC_FIELD: &str = "spec";

/// Marker value of the v2 card schema.
pub const SPEC_V2: &str = "chara_card_v2";

/// Marker value of the v3 card schema.
pub const SPEC_V3: &str = "chara_card_v3";

/// Detected card schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardFormat {
    /// Legacy flat card: no marker, but `name` and `description` present.
    V1,
    V2,
    V3,
    Unknown,
}

impl CardFormat {
    /// Classify a parsed card.
    ///
    /// The marker is checked first; only a card without one falls back to
    /// the v1 shape test. Anything else, including non-objects, is
    /// [`CardFormat::Unknown`].
    pub fn classify(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return CardFormat::Unknown;
        };

        match object.get(SPEC_FIELD) {
            Some(spec) if spec.as_str() == Some(SPEC_V2) => CardFormat::V2,
            Some(spec) if spec.as_str() == Some(SPEC_V3) => CardFormat::V3,
            Some(_) => CardFormat::Unknown,
            None if object.contains_key("name") && object.contains_key("description") => {
                CardFormat::V1
            }
            None => CardFormat::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardFormat::V1 => "v1",
            CardFormat::V2 => "v2",
            CardFormat::V3 => "v3",
            CardFormat::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CardFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
