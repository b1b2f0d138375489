mod envelope;
pub use envelope::{ApiListResponse, ApiResponse, AuthResponse, ErrorBody, OneOrMany};

pub mod entity;

mod validate;
pub use validate::{Validate, ValidationErrors, validate_certificate_id};

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a backend record. Records arrive with `_id`, `id` or both;
/// `_id` wins when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordId {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl RecordId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        let id = id.into();
        Self {
            object_id: Some(id.clone()),
            id: Some(id),
        }
    }

    /// Resolved identifier, empty when the record carried none.
    pub fn as_str(&self) -> &str {
        self.object_id
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `null` and a missing field both decode to `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
