//! Courses and Cross-Session Course Memory
//!
//! A `Course` is immutable reference data fetched from the catalog service.
//! `CourseMemory` records which courses the user has opened for reading, so
//! that later tutoring turns can reference previously studied material. It is
//! the only state that outlives an individual chat session: created empty at
//! application start and never cleared while the process runs.

use serde::{Deserialize, Serialize};

/// A single course from the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
}

impl Course {
    /// The placeholder substituted when a course lookup fails.
    ///
    /// Catalog failures are surfaced as readable content rather than as an
    /// error the caller has to handle.
    pub fn not_found(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: "Course Not Found".to_string(),
            description: String::new(),
            content: "Sorry, the requested course could not be found.".to_string(),
        }
    }
}

/// Insertion-ordered, deduplicated record of courses the user has opened.
///
/// Append-only for the process lifetime; recording the same course id twice
/// is a no-op, so order always reflects first viewing.
#[derive(Debug, Default)]
pub struct CourseMemory {
    viewed: Vec<Course>,
}

impl CourseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a course as viewed. Idempotent per course id.
    pub fn record(&mut self, course: Course) {
        if self.viewed.iter().any(|c| c.id == course.id) {
            return;
        }
        tracing::debug!(course_id = %course.id, "Recording viewed course");
        self.viewed.push(course);
    }

    /// Snapshot of viewed course titles, in first-viewing order.
    ///
    /// This is the auxiliary context attached to single-agent chat requests.
    pub fn titles(&self) -> Vec<String> {
        self.viewed.iter().map(|c| c.title.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.viewed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewed.is_empty()
    }
}
