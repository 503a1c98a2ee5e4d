//! Submission and grading DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
    #[validate(url)]
    pub attachment_url: Option<String>,
}

impl SubmitRequest {
    pub fn into_row(self, assignment_id: Uuid, student_id: Uuid, now: DateTime<Utc>) -> Value {
        json!({
            "assignment_id": assignment_id,
            "student_id": student_id,
            "content": self.content,
            "attachment_url": self.attachment_url,
            "submitted_at": now,
            "grade": null,
            "feedback": null,
        })
    }
}

/// Grade on a 0 to 100 scale with optional feedback.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeRequest {
    #[validate(range(min = 0, max = 100))]
    #[schema(example = 92, minimum = 0, maximum = 100)]
    pub grade: i32,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}

impl GradeRequest {
    pub fn into_patch(self, graded_by: Uuid, now: DateTime<Utc>) -> Value {
        json!({
            "grade": self.grade,
            "feedback": self.feedback,
            "graded_by": graded_by,
            "graded_at": now,
        })
    }
}
