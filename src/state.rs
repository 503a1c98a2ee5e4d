use std::sync::Arc;

use anyhow::Context;
use clap::ValueEnum;

use learnhub_auth::{GoTrueClient, SessionProvider, SessionResolver};
use learnhub_config::{CorsConfig, ProviderConfig, RouteConfig, SessionConfig};
use learnhub_store::{DataStore, MemoryStore, PostgrestStore};

/// Where business rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataBackend {
    /// The hosted PostgREST-compatible data API.
    Postgrest,
    /// Process memory; rows vanish on restart.
    Memory,
}

/// Shared, immutable request state.
///
/// The provider and store clients are built once at startup and handed in,
/// so tests can swap either for an in-memory double.
#[derive(Clone)]
pub struct AppState {
    pub resolver: SessionResolver,
    pub provider: Arc<dyn SessionProvider>,
    pub store: Arc<dyn DataStore>,
    pub session_config: SessionConfig,
    pub route_config: RouteConfig,
    pub cors_config: CorsConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.name())
            .field("store", &self.store.name())
            .field("session_config", &self.session_config)
            .field("route_config", &self.route_config)
            .field("cors_config", &self.cors_config)
            .finish()
    }
}

impl AppState {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        store: Arc<dyn DataStore>,
        session_config: SessionConfig,
        route_config: RouteConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            resolver: SessionResolver::new(provider.clone()),
            provider,
            store,
            session_config,
            route_config,
            cors_config,
        }
    }
}

/// Builds the state from environment variables.
pub fn init_app_state(backend: DataBackend) -> anyhow::Result<AppState> {
    let provider_config =
        ProviderConfig::from_env().context("failed to load auth provider configuration")?;

    let provider: Arc<dyn SessionProvider> = Arc::new(
        GoTrueClient::new(provider_config.clone()).context("failed to build auth client")?,
    );

    let store: Arc<dyn DataStore> = match backend {
        DataBackend::Postgrest => Arc::new(
            PostgrestStore::new(provider_config).context("failed to build data API client")?,
        ),
        DataBackend::Memory => Arc::new(MemoryStore::new()),
    };

    Ok(AppState::new(
        provider,
        store,
        SessionConfig::from_env(),
        RouteConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
