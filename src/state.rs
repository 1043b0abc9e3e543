use std::sync::Arc;

use crate::{
    auth::services::JwtKeys,
    config::AppConfig,
    db::PgStore,
    individuals::repo::IndividualStore,
    textgen::{GeminiClient, TextGenerator},
    users::repo::UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub individuals: Arc<dyn IndividualStore>,
    /// `None` when text generation is not configured.
    pub textgen: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    /// Connects to Postgres (running migrations) and builds the collaborators.
    /// The returned store is kept by the caller to close the pool on shutdown.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgStore)> {
        let store = PgStore::connect(&config).await?;
        let textgen = GeminiClient::from_config(&config.textgen)?;

        let state = Self::from_parts(
            Arc::new(config),
            Arc::new(store.clone()) as Arc<dyn UserStore>,
            Arc::new(store.clone()) as Arc<dyn IndividualStore>,
            textgen,
        );
        Ok((state, store))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        individuals: Arc<dyn IndividualStore>,
        textgen: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        let jwt = JwtKeys::new(&config.jwt);
        Self {
            config,
            jwt,
            users,
            individuals,
            textgen,
        }
    }
}
