use serde::{Deserialize, Serialize};

use crate::model::entity::User;

/// `{ success, data }` wrapper used by every single-item endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
}

/// List wrapper; `count` is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiListResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default = "Vec::new", deserialize_with = "super::null_as_default")]
    pub data: Vec<T>,
}

impl<T> ApiListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len() as u64),
            data,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    pub token: String,
    pub user: User,
}

/// Failure body. The backend fills either `error` or `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.is_empty())
            .or(self.message.filter(|m| !m.is_empty()))
    }
}

/// Some endpoints answer with a single object where a list is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

fn default_success() -> bool {
    true
}
