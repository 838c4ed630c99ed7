use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::auth_service::{Session, UserIdentity};

// Respuesta al iniciar sesión
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserIdentity,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            expires_at: session.token.claims.expires_at(),
            token: session.token.token,
            token_type: "Bearer",
            user: session.user,
        }
    }
}
