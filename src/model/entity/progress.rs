use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{RecordId, entity::CourseRef, null_as_default};

/// Per-user, per-course record of completed videos.
///
/// `completed_videos` is a set in meaning but a list on the wire; it may
/// carry duplicates and ids that are no longer part of the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(flatten)]
    key: RecordId,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    course: Option<CourseRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    completed_videos: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    completed: bool,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    pub fn new<I: Into<String>>(
        id: I,
        user: Option<String>,
        course: CourseRef,
        completed_videos: Vec<String>,
    ) -> Self {
        Self {
            key: RecordId::new(id),
            user,
            course: Some(course),
            completed_videos,
            completed: false,
            completed_at: None,
        }
    }

    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn course(&self) -> Option<&CourseRef> {
        self.course.as_ref()
    }

    /// Resolved id of the referenced course, empty when missing.
    pub fn course_id(&self) -> &str {
        self.course.as_ref().map(CourseRef::id).unwrap_or_default()
    }

    pub fn completed_videos(&self) -> &[String] {
        &self.completed_videos
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}
