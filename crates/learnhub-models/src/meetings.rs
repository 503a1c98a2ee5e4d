//! Meeting DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_meeting_window"))]
pub struct CreateMeetingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub class_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    #[validate(url)]
    pub meeting_url: Option<String>,
}

fn validate_meeting_window(request: &CreateMeetingRequest) -> Result<(), ValidationError> {
    match request.ends_at {
        Some(ends_at) if ends_at <= request.starts_at => {
            let mut error = ValidationError::new("meeting_window");
            error.message = Some("ends_at must be after starts_at".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

impl CreateMeetingRequest {
    pub fn into_row(self, host_id: Uuid) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "class_id": self.class_id,
            "starts_at": self.starts_at,
            "ends_at": self.ends_at,
            "meeting_url": self.meeting_url,
            "host_id": host_id,
        })
    }
}
