//! Google Distance Matrix API response types.
//!
//! Elements and addresses are kept as raw JSON so that one malformed entry
//! does not fail deserialization of the whole response; callers decode each
//! one with [`MatrixElement::from_value`] or [`DistanceMatrixResponse::destination_address`].

use serde::Deserialize;

/// Top-level response envelope.
///
/// `status` is `"OK"` on success; anything else is a request-level failure
/// described by `error_message`.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Provider's geocoded interpretation of each origin.
    #[serde(default)]
    pub origin_addresses: Vec<serde_json::Value>,
    /// Provider's geocoded interpretation of each destination, in request order.
    #[serde(default)]
    pub destination_addresses: Vec<serde_json::Value>,
    /// One row per origin; this tool always sends exactly one. A row that is
    /// not an object with an `elements` array decodes as an empty row.
    #[serde(default, deserialize_with = "lenient_rows")]
    pub rows: Vec<MatrixRow>,
}

impl DistanceMatrixResponse {
    /// Raw element for destination `index` of the first (only) origin row.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&serde_json::Value> {
        self.rows.first().and_then(|row| row.elements.get(index))
    }

    #[must_use]
    pub fn origin_address(&self) -> Option<&str> {
        self.origin_addresses.first().and_then(serde_json::Value::as_str)
    }

    /// Resolved address for destination `index`, if present and a string.
    #[must_use]
    pub fn destination_address(&self, index: usize) -> Option<&str> {
        self.destination_addresses
            .get(index)
            .and_then(serde_json::Value::as_str)
    }
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<MatrixRow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| MatrixRow::deserialize(row).unwrap_or_default())
        .collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
}

/// A single origin/destination pair.
///
/// `status` is `OK`, `NOT_FOUND`, or `ZERO_RESULTS`; `distance` and
/// `duration` are only present for `OK`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

impl MatrixElement {
    /// Decodes one raw element.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the element lacks a `status` or a
    /// present `distance`/`duration` has the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// `{ "text": "5.2 mi", "value": 8369 }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}
