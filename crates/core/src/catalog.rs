//! Course Catalog Client
//!
//! Read-only client for the external course catalog. Listing failures are
//! reported to the caller; a failed single-course lookup is substituted with
//! the `Course::not_found` placeholder so navigation never crashes on a bad
//! or stale course id.

use crate::course::Course;
use crate::gateway::GatewayError;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CourseList {
    courses: Vec<Course>,
}

/// Client for the catalog endpoints.
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl CourseCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetches the full course list.
    pub async fn list(&self) -> Result<Vec<Course>, GatewayError> {
        let url = format!("{}/api/courses", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let list: CourseList = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(list.courses)
    }

    /// Fetches one course by id.
    ///
    /// Any failure (unreachable catalog, non-success status, malformed body)
    /// yields the fixed "not found" placeholder instead of an error.
    pub async fn fetch(&self, id: &str) -> Course {
        match self.try_fetch(id).await {
            Ok(course) => course,
            Err(e) => {
                warn!(course_id = %id, error = %e, "Course lookup failed; using placeholder");
                Course::not_found(id)
            }
        }
    }

    async fn try_fetch(&self, id: &str) -> Result<Course, GatewayError> {
        let url = format!("{}/api/courses/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
