use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use learnhub_auth::{Identity, Role, SessionProvider};
use learnhub_core::AppError;
use learnhub_models::{Profile, UserFilterParams};
use learnhub_store::{Caller, DataStore, Query};

use crate::utils::rows::first_row;

const PROFILES: &str = "profiles";

pub struct UserService;

impl UserService {
    #[instrument(skip(store))]
    pub async fn get_profile(
        store: &dyn DataStore,
        caller: Caller<'_>,
        user_id: Uuid,
    ) -> Result<Value, AppError> {
        let rows = store
            .select(PROFILES, &Query::new().eq("id", user_id).limit(1), caller)
            .await?;
        first_row(rows, "Profile")
    }

    #[instrument(skip(store))]
    pub async fn list_profiles(
        store: &dyn DataStore,
        caller: Caller<'_>,
        filters: UserFilterParams,
    ) -> Result<Vec<Value>, AppError> {
        let mut query = Query::new().order_by("full_name", false);
        if let Some(role) = filters.role {
            query = query.eq("role", role.as_str());
        }

        Ok(store.select(PROFILES, &query, caller).await?)
    }

    /// Writes the profile cache row with the service key, replacing any
    /// existing row for the same user.
    #[instrument(skip(store), fields(user_id = %profile.id))]
    pub async fn cache_profile(store: &dyn DataStore, profile: &Profile) -> Result<(), AppError> {
        let row = serde_json::to_value(profile).map_err(AppError::internal)?;

        let updated = store
            .update(
                PROFILES,
                &Query::new().eq("id", profile.id),
                row.clone(),
                Caller::Service,
            )
            .await?;

        if updated.is_empty() {
            store.insert(PROFILES, row, Caller::Service).await?;
        }

        Ok(())
    }

    /// Sets the user's role in provider metadata, then refreshes the
    /// profile cache from the provider's answer.
    #[instrument(skip(provider, store))]
    pub async fn change_role(
        provider: &dyn SessionProvider,
        store: &dyn DataStore,
        user_id: Uuid,
        role: Role,
    ) -> Result<Profile, AppError> {
        let user = provider.update_user_role(user_id, role).await?;
        let profile = Profile::from(&Identity::from(&user));

        Self::cache_profile(store, &profile).await?;
        tracing::info!(user_id = %user_id, role = %profile.role, "role changed");

        Ok(profile)
    }
}
