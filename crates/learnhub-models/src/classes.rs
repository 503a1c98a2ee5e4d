//! Class DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Algebra I")]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Free-form schedule, e.g. "Mon/Wed 10:00".
    #[validate(length(max = 200))]
    pub schedule: Option<String>,
}

impl CreateClassRequest {
    /// Row to insert, owned by `teacher_id`.
    pub fn into_row(self, teacher_id: Uuid) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "schedule": self.schedule,
            "teacher_id": teacher_id,
        })
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub schedule: Option<String>,
}

impl UpdateClassRequest {
    pub fn into_patch(self) -> Value {
        let mut patch = Map::new();
        if let Some(name) = self.name {
            patch.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = self.description {
            patch.insert("description".to_string(), Value::String(description));
        }
        if let Some(schedule) = self.schedule {
            patch.insert("schedule".to_string(), Value::String(schedule));
        }
        Value::Object(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.schedule.is_none()
    }
}
