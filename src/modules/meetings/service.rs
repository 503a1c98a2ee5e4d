use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use learnhub_auth::Identity;
use learnhub_core::AppError;
use learnhub_models::CreateMeetingRequest;
use learnhub_store::{Caller, DataStore, Query};

use crate::utils::auth_helpers::ensure_owner;
use crate::utils::rows::{first_row, stamp};

pub(crate) const MEETINGS: &str = "meetings";

pub struct MeetingService;

impl MeetingService {
    /// Meetings ordered by start time.
    #[instrument(skip(store))]
    pub async fn list_meetings(
        store: &dyn DataStore,
        caller: Caller<'_>,
    ) -> Result<Vec<Value>, AppError> {
        let query = Query::new().order_by("starts_at", false);
        Ok(store.select(MEETINGS, &query, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_meeting(
        store: &dyn DataStore,
        caller: Caller<'_>,
        host_id: Uuid,
        dto: CreateMeetingRequest,
    ) -> Result<Value, AppError> {
        let row = stamp(dto.into_row(host_id), "created_at", Utc::now());
        Ok(store.insert(MEETINGS, row, caller).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_meeting(
        store: &dyn DataStore,
        caller: Caller<'_>,
        identity: &Identity,
        id: Uuid,
    ) -> Result<(), AppError> {
        let rows = store
            .select(MEETINGS, &Query::new().eq("id", id).limit(1), caller)
            .await?;
        let meeting = first_row(rows, "Meeting")?;
        ensure_owner(identity, &meeting, "host_id", "meetings")?;

        store.delete(MEETINGS, &Query::new().eq("id", id), caller).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone};
    use learnhub_auth::Role;
    use learnhub_store::MemoryStore;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "grace@learnhub.test".to_string(),
            name: "Grace".to_string(),
            role,
            avatar: None,
        }
    }

    fn meeting(title: &str, day: u32) -> CreateMeetingRequest {
        let starts_at = Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap();
        CreateMeetingRequest {
            title: title.to_string(),
            description: None,
            class_id: None,
            starts_at,
            ends_at: Some(starts_at + Duration::hours(1)),
            meeting_url: None,
        }
    }

    #[tokio::test]
    async fn test_meetings_are_listed_by_start() {
        let store = MemoryStore::new();
        let host = identity(Role::Teacher);
        MeetingService::create_meeting(&store, Caller::Service, host.id, meeting("Later", 20))
            .await
            .unwrap();
        MeetingService::create_meeting(&store, Caller::Service, host.id, meeting("Sooner", 5))
            .await
            .unwrap();

        let meetings = MeetingService::list_meetings(&store, Caller::Service).await.unwrap();
        assert_eq!(meetings[0]["title"], "Sooner");
        assert_eq!(meetings[1]["title"], "Later");
        assert_eq!(meetings[0]["host_id"], host.id.to_string());
    }

    #[tokio::test]
    async fn test_only_host_or_admin_deletes() {
        let store = MemoryStore::new();
        let host = identity(Role::Teacher);
        let created =
            MeetingService::create_meeting(&store, Caller::Service, host.id, meeting("Office hours", 9))
                .await
                .unwrap();
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let err = MeetingService::delete_meeting(&store, Caller::Service, &identity(Role::Teacher), id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        MeetingService::delete_meeting(&store, Caller::Service, &host, id)
            .await
            .unwrap();
        assert!(store.rows(MEETINGS).is_empty());
    }
}
