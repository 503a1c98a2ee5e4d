use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use learnhub_auth::Identity;
use learnhub_core::AppError;
use learnhub_models::{CreateClassRequest, UpdateClassRequest};
use learnhub_store::{Caller, DataStore, Query};

use crate::utils::auth_helpers::ensure_owner;
use crate::utils::rows::{first_row, stamp};

pub(crate) const CLASSES: &str = "classes";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(store))]
    pub async fn list_classes(
        store: &dyn DataStore,
        caller: Caller<'_>,
    ) -> Result<Vec<Value>, AppError> {
        let query = Query::new().order_by("created_at", true);
        Ok(store.select(CLASSES, &query, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn get_class(
        store: &dyn DataStore,
        caller: Caller<'_>,
        id: Uuid,
    ) -> Result<Value, AppError> {
        let rows = store
            .select(CLASSES, &Query::new().eq("id", id).limit(1), caller)
            .await?;
        first_row(rows, "Class")
    }

    #[instrument(skip(store))]
    pub async fn create_class(
        store: &dyn DataStore,
        caller: Caller<'_>,
        teacher_id: Uuid,
        dto: CreateClassRequest,
    ) -> Result<Value, AppError> {
        let row = stamp(dto.into_row(teacher_id), "created_at", Utc::now());
        Ok(store.insert(CLASSES, row, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn update_class(
        store: &dyn DataStore,
        caller: Caller<'_>,
        identity: &Identity,
        id: Uuid,
        dto: UpdateClassRequest,
    ) -> Result<Value, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        let class = Self::get_class(store, caller, id).await?;
        ensure_owner(identity, &class, "teacher_id", "classes")?;

        let patch = stamp(dto.into_patch(), "updated_at", Utc::now());
        let rows = store
            .update(CLASSES, &Query::new().eq("id", id), patch, caller)
            .await?;
        first_row(rows, "Class")
    }

    #[instrument(skip(store))]
    pub async fn delete_class(
        store: &dyn DataStore,
        caller: Caller<'_>,
        identity: &Identity,
        id: Uuid,
    ) -> Result<(), AppError> {
        let class = Self::get_class(store, caller, id).await?;
        ensure_owner(identity, &class, "teacher_id", "classes")?;

        store.delete(CLASSES, &Query::new().eq("id", id), caller).await?;
        Ok(())
    }
}
