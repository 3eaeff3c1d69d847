use std::sync::Arc;
use std::time::Duration;

use caseline_application::{
    AuditLogRepository, AuditRepository, AuthorizationService, PermissionAdminService,
    SessionService, UserDirectory,
};
use caseline_core::AppError;
use caseline_infrastructure::{
    AccessRegistries, Argon2PasswordHasher, HttpUserDirectory, InMemoryAuditRepository,
    InMemoryUserDirectory,
};
use tracing::{info, warn};

use crate::api_config::ApiConfig;
use crate::dev_seed;
use crate::state::AppState;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let registries = match config.access_registry_path.as_deref() {
        Some(path) => AccessRegistries::load(path)?,
        None => AccessRegistries::builtin(),
    };
    let authorization_service =
        AuthorizationService::new(Arc::new(registries.roles), Arc::new(registries.templates));

    let user_directory = build_user_directory(config).await?;
    let audit_store = Arc::new(InMemoryAuditRepository::new());
    let audit_repository: Arc<dyn AuditRepository> = audit_store.clone();
    let audit_log_repository: Arc<dyn AuditLogRepository> = audit_store;

    Ok(AppState {
        session_service: SessionService::new(
            authorization_service.clone(),
            user_directory.clone(),
        ),
        permission_admin_service: PermissionAdminService::new(
            authorization_service,
            user_directory,
            audit_repository,
            audit_log_repository,
        ),
        frontend_url: config.frontend_url.clone(),
    })
}

async fn build_user_directory(config: &ApiConfig) -> Result<Arc<dyn UserDirectory>, AppError> {
    if let Some(base_url) = config.data_api_url.clone() {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build data API client: {error}"))
            })?;

        info!(data_api_url = %base_url, "using remote user directory");
        return Ok(Arc::new(HttpUserDirectory::new(
            http_client,
            base_url,
            config.data_api_token.clone(),
        )));
    }

    warn!("DATA_API_URL is not set; using seeded in-memory user directory");
    let directory = InMemoryUserDirectory::new(Arc::new(Argon2PasswordHasher::new()));
    dev_seed::seed_directory(&directory).await?;
    Ok(Arc::new(directory))
}
