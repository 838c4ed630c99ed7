use crate::dto::auth_dto::SessionResponse;
use crate::dto::ApiResponse;
use crate::services::auth_service::{AuthService, SignInCredential};
use crate::utils::errors::AppError;
use crate::utils::jwt::JwtClaims;

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(service: AuthService) -> Self {
        Self { service }
    }

    pub async fn sign_in(&self, credential: SignInCredential) -> Result<ApiResponse<SessionResponse>, AppError> {
        let session = self.service.sign_in(&credential).await?;
        Ok(ApiResponse::success(SessionResponse::from(session)))
    }

    pub async fn sign_out(&self, claims: &JwtClaims) -> Result<ApiResponse<()>, AppError> {
        self.service.sign_out(claims).await?;
        Ok(ApiResponse::message("Signed out"))
    }
}
