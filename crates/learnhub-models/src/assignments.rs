//! Assignment DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Chapter 3 exercises")]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1000))]
    pub max_points: Option<i32>,
}

impl CreateAssignmentRequest {
    pub fn into_row(self, class_id: Uuid, created_by: Uuid) -> Value {
        json!({
            "class_id": class_id,
            "title": self.title,
            "description": self.description,
            "due_date": self.due_date,
            "max_points": self.max_points.unwrap_or(100),
            "created_by": created_by,
        })
    }
}
