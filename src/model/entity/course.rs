use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{RecordId, null_as_default};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(flatten)]
    key: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

impl Video {
    pub fn new<I, T, U>(id: I, title: T, url: U) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            key: RecordId::new(id),
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A course and its ordered video roster. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(flatten)]
    key: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    videos: Vec<Video>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn new<I, T, D>(id: I, title: T, description: D, videos: Vec<Video>) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        Self {
            key: RecordId::new(id),
            title: title.into(),
            description: description.into(),
            videos,
            created_at: None,
        }
    }

    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.videos.iter().map(Video::id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInput {
    pub title: String,
    pub url: String,
}

/// Body of course create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    pub videos: Vec<VideoInput>,
}
