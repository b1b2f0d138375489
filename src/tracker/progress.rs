use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::entity::{Course, ProgressRecord};

/// Completion summary of one course for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseProgress {
    course_id: String,
    completed_count: usize,
    total_count: usize,
    percentage: u8,
    completed_video_ids: BTreeSet<String>,
}

impl CourseProgress {
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Number of the course's videos the user has completed.
    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Deduplicated completed ids as recorded, stale ids included.
    pub fn completed_video_ids(&self) -> &BTreeSet<String> {
        &self.completed_video_ids
    }

    pub fn is_video_completed(&self, video_id: &str) -> bool {
        self.completed_video_ids.contains(video_id)
    }

    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.completed_count == self.total_count
    }
}

/// Progress record of `course_id`, whichever shape its course reference has.
pub fn find_record<'a>(course_id: &str, records: &'a [ProgressRecord]) -> Option<&'a ProgressRecord> {
    records
        .iter()
        .find(|record| record.course().is_some_and(|c| c.refers_to(course_id)))
}

/// Integer percentage rounded half up, `0` for an empty course.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

/// Summarizes the user's progress on `course`. A missing record is an empty
/// one; ids the course does not know are kept in the set but do not count.
pub fn aggregate(course: &Course, records: &[ProgressRecord]) -> CourseProgress {
    let completed_video_ids: BTreeSet<String> = find_record(course.id(), records)
        .map(|record| record.completed_videos().iter().cloned().collect())
        .unwrap_or_default();

    let total_count = course.videos().len();
    let completed_count = course
        .video_ids()
        .filter(|id| completed_video_ids.contains(*id))
        .count();

    CourseProgress {
        course_id: course.id().to_string(),
        completed_count,
        total_count,
        percentage: percentage(completed_count, total_count),
        completed_video_ids,
    }
}
