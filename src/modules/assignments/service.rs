use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use learnhub_auth::Identity;
use learnhub_core::AppError;
use learnhub_models::CreateAssignmentRequest;
use learnhub_store::{Caller, DataStore, Query};

use crate::modules::classes::service::ClassService;
use crate::utils::auth_helpers::ensure_owner;
use crate::utils::rows::{first_row, stamp};

pub(crate) const ASSIGNMENTS: &str = "assignments";

pub struct AssignmentService;

impl AssignmentService {
    /// Assignments of a class, earliest due date first.
    #[instrument(skip(store))]
    pub async fn list_for_class(
        store: &dyn DataStore,
        caller: Caller<'_>,
        class_id: Uuid,
    ) -> Result<Vec<Value>, AppError> {
        ClassService::get_class(store, caller, class_id).await?;

        let query = Query::new()
            .eq("class_id", class_id)
            .order_by("due_date", false);
        Ok(store.select(ASSIGNMENTS, &query, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn get_assignment(
        store: &dyn DataStore,
        caller: Caller<'_>,
        id: Uuid,
    ) -> Result<Value, AppError> {
        let rows = store
            .select(ASSIGNMENTS, &Query::new().eq("id", id).limit(1), caller)
            .await?;
        first_row(rows, "Assignment")
    }

    /// Only the class owner (or an admin) can add assignments to a class.
    #[instrument(skip(store))]
    pub async fn create_assignment(
        store: &dyn DataStore,
        caller: Caller<'_>,
        identity: &Identity,
        class_id: Uuid,
        dto: CreateAssignmentRequest,
    ) -> Result<Value, AppError> {
        let class = ClassService::get_class(store, caller, class_id).await?;
        ensure_owner(identity, &class, "teacher_id", "classes")?;

        let row = stamp(dto.into_row(class_id, identity.id), "created_at", Utc::now());
        Ok(store.insert(ASSIGNMENTS, row, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_assignment(
        store: &dyn DataStore,
        caller: Caller<'_>,
        identity: &Identity,
        id: Uuid,
    ) -> Result<(), AppError> {
        let assignment = Self::get_assignment(store, caller, id).await?;
        ensure_owner(identity, &assignment, "created_by", "assignments")?;

        store
            .delete(ASSIGNMENTS, &Query::new().eq("id", id), caller)
            .await?;
        Ok(())
    }
}
