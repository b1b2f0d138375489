//! Query cache shared by all actions of one [`AppContext`](crate::AppContext).
//!
//! Every fetch takes a [`Ticket`]. Invalidating a key bumps its generation
//! and cancels the tickets handed out before, so a superseded response is
//! never written back.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::model::entity::{Certificate, Course, ProgressRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Courses,
    Course(String),
    Progress,
    Certificates,
}

#[derive(Debug, Clone)]
pub enum Cached {
    Courses(Vec<Course>),
    Course(Course),
    Progress(Vec<ProgressRecord>),
    Certificates(Vec<Certificate>),
}

#[derive(Debug)]
struct Slot {
    value: Option<Cached>,
    generation: u64,
    token: CancellationToken,
}

impl Slot {
    fn new(parent: &CancellationToken) -> Self {
        Self {
            value: None,
            generation: 0,
            token: parent.child_token(),
        }
    }
}

/// Permission to store the result of one fetch.
#[derive(Debug, Clone)]
pub struct Ticket {
    key: QueryKey,
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct QueryCache {
    slots: HashMap<QueryKey, Slot>,
    root: CancellationToken,
}

impl QueryCache {
    /// Tickets are children of `root`; cancelling it stops every fetch.
    pub fn new(root: CancellationToken) -> Self {
        Self {
            slots: HashMap::new(),
            root,
        }
    }

    fn slot(&mut self, key: &QueryKey) -> &mut Slot {
        let root = &self.root;
        self.slots
            .entry(key.clone())
            .or_insert_with(|| Slot::new(root))
    }

    pub fn get(&self, key: &QueryKey) -> Option<&Cached> {
        self.slots.get(key).and_then(|slot| slot.value.as_ref())
    }

    pub fn courses(&self) -> Option<Vec<Course>> {
        match self.get(&QueryKey::Courses) {
            Some(Cached::Courses(courses)) => Some(courses.clone()),
            _ => None,
        }
    }

    pub fn course(&self, course_id: &str) -> Option<Course> {
        match self.get(&QueryKey::Course(course_id.to_string())) {
            Some(Cached::Course(course)) => Some(course.clone()),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<Vec<ProgressRecord>> {
        match self.get(&QueryKey::Progress) {
            Some(Cached::Progress(records)) => Some(records.clone()),
            _ => None,
        }
    }

    pub fn certificates(&self) -> Option<Vec<Certificate>> {
        match self.get(&QueryKey::Certificates) {
            Some(Cached::Certificates(certificates)) => Some(certificates.clone()),
            _ => None,
        }
    }

    pub fn begin(&mut self, key: QueryKey) -> Ticket {
        let slot = self.slot(&key);
        Ticket {
            generation: slot.generation,
            token: slot.token.child_token(),
            key,
        }
    }

    /// Stores `value` if `ticket` is still current. Returns whether it was.
    pub fn store(&mut self, ticket: &Ticket, value: Cached) -> bool {
        if ticket.is_cancelled() {
            tracing::debug!(key = ?ticket.key, "dropping response of cancelled fetch");
            return false;
        }

        let slot = self.slot(&ticket.key);
        if slot.generation != ticket.generation {
            tracing::debug!(key = ?ticket.key, "dropping stale response");
            return false;
        }

        slot.value = Some(value);
        true
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.generation += 1;
            slot.token.cancel();
            slot.token = self.root.child_token();
            slot.value = None;
        }
    }

    /// Invalidates every key. Used on logout and session expiry.
    pub fn clear(&mut self) {
        let keys: Vec<QueryKey> = self.slots.keys().cloned().collect();
        for key in &keys {
            self.invalidate(key);
        }
    }
}
