//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::auth_service::{
    AuthService, DevIdentityProvider, IdentityProvider, UnconfiguredIdentityProvider,
};
use crate::services::record_service::RecordService;
use crate::store::DocumentStore;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: EnvironmentConfig,
    pub record_service: RecordService,
    pub auth_service: AuthService,
}

impl AppState {
    /// Estado con el proveedor de identidad que corresponde al entorno
    pub fn new(store: Arc<dyn DocumentStore>, config: EnvironmentConfig) -> Self {
        let provider: Arc<dyn IdentityProvider> = if config.is_development() {
            Arc::new(DevIdentityProvider)
        } else {
            Arc::new(UnconfiguredIdentityProvider)
        };
        Self::with_identity_provider(store, config, provider)
    }

    pub fn with_identity_provider(
        store: Arc<dyn DocumentStore>,
        config: EnvironmentConfig,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let auth_service = AuthService::new(provider, JwtConfig::from(&config));
        Self {
            record_service: RecordService::new(store.clone()),
            store,
            config,
            auth_service,
        }
    }
}
