use std::sync::Arc;

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::database::{CompanyRepository, JobRepository, Storage, UserRepository};

/// Shared per-process state handed to every handler and guard.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub storage: Arc<dyn Storage>,
    pub companies: Arc<CompanyRepository>,
    pub jobs: Arc<JobRepository>,
    pub users: Arc<UserRepository>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>) -> Result<Self, JwtError> {
        let keys = JwtKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        Ok(Self {
            config: Arc::new(config),
            keys: Arc::new(keys),
            companies: Arc::new(CompanyRepository::new(storage.clone())),
            jobs: Arc::new(JobRepository::new(storage.clone())),
            users: Arc::new(UserRepository::new(storage.clone())),
            storage,
        })
    }
}
