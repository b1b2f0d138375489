use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use crate::model::entity::Course;

/// A certificate may be generated once every video of the course is
/// completed. Counts alone are not trusted: the deduplicated set must have
/// exactly the roster's size and contain every roster id, so a foreign id
/// can never stand in for a missing one.
pub fn is_eligible_for_certificate<I, S>(course: &Course, completed_video_ids: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let completed: BTreeSet<String> = completed_video_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();

    completed.len() == course.videos().len()
        && course.video_ids().all(|id| completed.contains(id))
}

/// Keeps certificate generation at most one request in flight per course.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another generation for `course_id` is outstanding.
    pub fn try_acquire(&self, course_id: &str) -> Option<GenerationPermit> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(course_id.to_string()) {
            return None;
        }

        Some(GenerationPermit {
            course_id: course_id.to_string(),
            in_flight: self.in_flight.clone(),
        })
    }

    pub fn is_in_flight(&self, course_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(course_id)
    }
}

/// Released on drop, whether the request succeeded or not.
#[derive(Debug)]
pub struct GenerationPermit {
    course_id: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl GenerationPermit {
    pub fn course_id(&self) -> &str {
        &self.course_id
    }
}

impl Drop for GenerationPermit {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.course_id);
    }
}
