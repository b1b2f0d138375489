use serde::{Deserialize, Serialize};

use crate::model::RecordId;

/// Partial course embedded in progress and certificate records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    key: RecordId,
    #[serde(default)]
    title: Option<String>,
}

impl CourseSummary {
    pub fn new<I: Into<String>>(id: I, title: Option<String>) -> Self {
        Self {
            key: RecordId::new(id),
            title,
        }
    }

    pub fn id(&self) -> &str {
        self.key.as_str()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Reference to a course as sent by the backend: either the bare id or a
/// populated partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseRef {
    Id(String),
    Embedded(CourseSummary),
}

impl CourseRef {
    /// The only place a course reference is resolved to an id. Comparisons
    /// must go through this.
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded(summary) => summary.id(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Embedded(summary) => summary.title(),
        }
    }

    pub fn refers_to(&self, course_id: &str) -> bool {
        !course_id.is_empty() && self.id() == course_id
    }
}

impl From<&str> for CourseRef {
    fn from(value: &str) -> Self {
        Self::Id(value.to_string())
    }
}
