use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use learnhub_core::AppError;

/// Reads a UUID column from an untyped row.
pub fn uuid_field(row: &Value, field: &str) -> Option<Uuid> {
    row.get(field)
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

/// First row of a lookup by id, or 404 naming `resource`.
pub fn first_row(rows: Vec<Value>, resource: &str) -> Result<Value, AppError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("{} not found", resource)))
}

/// Sets `field` to `now` on an object row. Non-objects are returned as-is.
pub fn stamp(mut row: Value, field: &str, now: DateTime<Utc>) -> Value {
    if let Some(object) = row.as_object_mut() {
        object.insert(field.to_string(), Value::String(now.to_rfc3339()));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_uuid_field() {
        let id = Uuid::new_v4();
        let row = json!({ "teacher_id": id, "name": "Algebra", "count": 3 });
        assert_eq!(uuid_field(&row, "teacher_id"), Some(id));
        assert_eq!(uuid_field(&row, "name"), None);
        assert_eq!(uuid_field(&row, "count"), None);
        assert_eq!(uuid_field(&row, "missing"), None);
    }

    #[test]
    fn test_first_row_missing_is_not_found() {
        let err = first_row(Vec::new(), "Class").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Class not found");
    }

    #[test]
    fn test_stamp_sets_timestamp() {
        let now = Utc::now();
        let row = stamp(json!({ "name": "Algebra" }), "created_at", now);
        assert_eq!(row["created_at"], now.to_rfc3339());
        assert_eq!(stamp(json!([1, 2]), "created_at", now), json!([1, 2]));
    }
}
