use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use learnhub_auth::Identity;
use learnhub_core::AppError;
use learnhub_models::{GradeRequest, SubmitRequest};
use learnhub_store::{Caller, DataStore, Query};

use crate::modules::assignments::service::AssignmentService;
use crate::utils::rows::first_row;

pub(crate) const SUBMISSIONS: &str = "submissions";

pub struct SubmissionService;

impl SubmissionService {
    /// One submission per student and assignment; a second one is a conflict.
    #[instrument(skip(store))]
    pub async fn submit(
        store: &dyn DataStore,
        caller: Caller<'_>,
        student_id: Uuid,
        assignment_id: Uuid,
        dto: SubmitRequest,
    ) -> Result<Value, AppError> {
        AssignmentService::get_assignment(store, caller, assignment_id).await?;

        let existing = store
            .select(
                SUBMISSIONS,
                &Query::new()
                    .eq("assignment_id", assignment_id)
                    .eq("student_id", student_id)
                    .limit(1),
                caller,
            )
            .await?;
        if !existing.is_empty() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "You have already submitted this assignment"
            )));
        }

        let row = dto.into_row(assignment_id, student_id, Utc::now());
        Ok(store.insert(SUBMISSIONS, row, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn list_for_assignment(
        store: &dyn DataStore,
        caller: Caller<'_>,
        assignment_id: Uuid,
    ) -> Result<Vec<Value>, AppError> {
        AssignmentService::get_assignment(store, caller, assignment_id).await?;

        let query = Query::new()
            .eq("assignment_id", assignment_id)
            .order_by("submitted_at", false);
        Ok(store.select(SUBMISSIONS, &query, caller).await?)
    }

    /// The student's own submissions, newest first.
    #[instrument(skip(store))]
    pub async fn list_for_student(
        store: &dyn DataStore,
        caller: Caller<'_>,
        student_id: Uuid,
    ) -> Result<Vec<Value>, AppError> {
        let query = Query::new()
            .eq("student_id", student_id)
            .order_by("submitted_at", true);
        Ok(store.select(SUBMISSIONS, &query, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn grade(
        store: &dyn DataStore,
        caller: Caller<'_>,
        grader: &Identity,
        id: Uuid,
        dto: GradeRequest,
    ) -> Result<Value, AppError> {
        let patch = dto.into_patch(grader.id, Utc::now());
        let rows = store
            .update(SUBMISSIONS, &Query::new().eq("id", id), patch, caller)
            .await?;

        let graded = first_row(rows, "Submission")?;
        tracing::info!(submission_id = %id, graded_by = %grader.id, "submission graded");
        Ok(graded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use learnhub_auth::Role;
    use learnhub_store::MemoryStore;
    use serde_json::json;

    use crate::modules::assignments::service::ASSIGNMENTS;

    fn answer() -> SubmitRequest {
        SubmitRequest {
            content: "x = 4".to_string(),
            attachment_url: None,
        }
    }

    #[tokio::test]
    async fn test_second_submission_conflicts() {
        let store = MemoryStore::new();
        let assignment_id = Uuid::new_v4();
        let student_id = Uuid::new_v4();
        store.seed(ASSIGNMENTS, json!({ "id": assignment_id }));

        let submitted =
            SubmissionService::submit(&store, Caller::Service, student_id, assignment_id, answer())
                .await
                .unwrap();
        assert_eq!(submitted["student_id"], student_id.to_string());
        assert!(submitted["grade"].is_null());

        let err =
            SubmissionService::submit(&store, Caller::Service, student_id, assignment_id, answer())
                .await
                .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(store.rows(SUBMISSIONS).len(), 1);
    }

    #[tokio::test]
    async fn test_submit_to_missing_assignment() {
        let store = MemoryStore::new();
        let err =
            SubmissionService::submit(&store, Caller::Service, Uuid::new_v4(), Uuid::new_v4(), answer())
                .await
                .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_grade_records_grader() {
        let store = MemoryStore::new();
        let submission = store.seed(SUBMISSIONS, json!({ "content": "x = 4" }));
        let id: Uuid = submission["id"].as_str().unwrap().parse().unwrap();
        let teacher = Identity {
            id: Uuid::new_v4(),
            email: "grace@learnhub.test".to_string(),
            name: "Grace".to_string(),
            role: Role::Teacher,
            avatar: None,
        };

        let graded = SubmissionService::grade(
            &store,
            Caller::Service,
            &teacher,
            id,
            GradeRequest {
                grade: 92,
                feedback: Some("Nice".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(graded["grade"], 92);
        assert_eq!(graded["graded_by"], teacher.id.to_string());
        assert!(graded["graded_at"].is_string());

        let err = SubmissionService::grade(
            &store,
            Caller::Service,
            &teacher,
            Uuid::new_v4(),
            GradeRequest {
                grade: 50,
                feedback: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
