//! Servicio de autenticación
//!
//! La identidad la resuelve un proveedor externo (`IdentityProvider`). Este
//! servicio traduce sus fallos a mensajes para el usuario, emite el token
//! de sesión y mantiene la lista de tokens revocados al cerrar sesión.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, IssuedToken, JwtClaims, JwtConfig};

/// Fallos de inicio de sesión que ve el usuario
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("sign-in cancelled by user")]
    Cancelled,

    #[error("network error during sign-in")]
    Network,

    #[error("identity provider not configured")]
    NotConfigured,

    #[error("sign-in failed: {0}")]
    Unknown(String),
}

impl AuthFailure {
    /// Traducir el código de error del proveedor de identidad
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/popup-closed-by-user" | "auth/cancelled-popup-request" => AuthFailure::Cancelled,
            "auth/network-request-failed" => AuthFailure::Network,
            other => AuthFailure::Unknown(other.to_string()),
        }
    }

    /// Mensaje para mostrar en la pantalla de acceso
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthFailure::Cancelled => "Sign-in cancelled by user.",
            AuthFailure::Network => "Network error. Please check your internet connection.",
            AuthFailure::NotConfigured => "Authentication service not initialized.",
            AuthFailure::Unknown(_) => "Sign-in failed. Please try again.",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::Cancelled => "AUTH_CANCELLED",
            AuthFailure::Network => "AUTH_NETWORK",
            AuthFailure::NotConfigured => "AUTH_NOT_CONFIGURED",
            AuthFailure::Unknown(_) => "AUTH_FAILED",
        }
    }
}

/// Identidad resuelta por el proveedor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Credencial que el cliente presenta al iniciar sesión
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInCredential {
    /// Id de usuario (proveedor de desarrollo)
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Código de error que el cliente recibió de su proveedor, si lo hubo
    #[serde(default)]
    pub provider_error: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credential: &SignInCredential) -> Result<UserIdentity, AuthFailure>;

    async fn sign_out(&self, user: &UserIdentity) -> Result<(), AuthFailure>;
}

/// Proveedor de desarrollo: acepta el id de usuario tal cual
#[derive(Debug, Default, Clone)]
pub struct DevIdentityProvider;

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn sign_in(&self, credential: &SignInCredential) -> Result<UserIdentity, AuthFailure> {
        if let Some(code) = &credential.provider_error {
            return Err(AuthFailure::from_code(code));
        }

        let user_id = credential
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthFailure::Unknown("missing user_id".to_string()))?;

        Ok(UserIdentity {
            user_id: user_id.to_string(),
            email: credential.email.clone(),
        })
    }

    async fn sign_out(&self, _user: &UserIdentity) -> Result<(), AuthFailure> {
        Ok(())
    }
}

/// Proveedor usado cuando no hay ninguno configurado
#[derive(Debug, Default, Clone)]
pub struct UnconfiguredIdentityProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredIdentityProvider {
    async fn sign_in(&self, _credential: &SignInCredential) -> Result<UserIdentity, AuthFailure> {
        Err(AuthFailure::NotConfigured)
    }

    async fn sign_out(&self, _user: &UserIdentity) -> Result<(), AuthFailure> {
        Err(AuthFailure::NotConfigured)
    }
}

/// Sesión recién iniciada
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserIdentity,
    pub token: IssuedToken,
}

#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    jwt_config: JwtConfig,
    // jti -> expiración del token revocado
    revoked_tokens: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            provider,
            jwt_config,
            revoked_tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    pub async fn sign_in(&self, credential: &SignInCredential) -> AppResult<Session> {
        let user = self.provider.sign_in(credential).await.map_err(|failure| {
            warn!("🔐 Inicio de sesión fallido: {}", failure);
            AppError::Auth(failure)
        })?;

        let token = generate_token(&user.user_id, &self.jwt_config)?;
        info!("🔐 Sesión iniciada para {}", user.user_id);
        Ok(Session { user, token })
    }

    /// Cerrar sesión: revocar el token y avisar al proveedor
    pub async fn sign_out(&self, claims: &JwtClaims) -> AppResult<()> {
        let expired = self.cleanup_expired_tokens().await;
        if expired > 0 {
            debug!("🧹 {} tokens revocados expirados eliminados", expired);
        }
        self.revoke(claims).await;

        let user = UserIdentity {
            user_id: claims.sub.clone(),
            email: None,
        };
        if let Err(failure) = self.provider.sign_out(&user).await {
            // El token ya está revocado; el fallo del proveedor sólo se registra
            warn!("⚠️ El proveedor no pudo cerrar la sesión de {}: {}", claims.sub, failure);
        }

        info!("👋 Sesión cerrada para {}", claims.sub);
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.revoked_tokens.read().await.contains_key(jti)
    }

    async fn revoke(&self, claims: &JwtClaims) {
        let mut revoked = self.revoked_tokens.write().await;
        revoked.insert(claims.jti.clone(), claims.expires_at());
    }

    /// Olvidar los tokens revocados que ya han expirado
    pub async fn cleanup_expired_tokens(&self) -> usize {
        let now = Utc::now();
        let mut revoked = self.revoked_tokens.write().await;
        let before = revoked.len();
        revoked.retain(|_, expires_at| *expires_at > now);
        before - revoked.len()
    }
}
