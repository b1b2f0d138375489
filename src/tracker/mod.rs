//! Completion tracking and certificate eligibility. Everything here is a pure
//! derivation over already fetched data and cannot fail.

mod progress;
pub use progress::{CourseProgress, aggregate, find_record, percentage};

mod eligibility;
pub use eligibility::{GenerationGate, GenerationPermit, is_eligible_for_certificate};

use serde::Serialize;

use crate::model::entity::Course;

/// A course together with what the current user has done in it.
#[derive(Debug, Clone, Serialize)]
pub struct CourseOverview {
    course: Course,
    progress: CourseProgress,
    eligible: bool,
}

impl CourseOverview {
    pub fn new(course: Course, records: &[crate::model::entity::ProgressRecord]) -> Self {
        let progress = aggregate(&course, records);
        let eligible = is_eligible_for_certificate(&course, progress.completed_video_ids());
        Self {
            course,
            progress,
            eligible,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn progress(&self) -> &CourseProgress {
        &self.progress
    }

    /// Whether the "generate certificate" action is enabled.
    pub fn eligible(&self) -> bool {
        self.eligible
    }
}
