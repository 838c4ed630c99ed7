//! Middleware de autenticación JWT
//!
//! Este módulo extrae y verifica el token de sesión e inyecta el usuario
//! autenticado en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token, JwtClaims},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub claims: JwtClaims,
}

/// Middleware de autenticación JWT: sólo header `Authorization`
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = header_token(&request)?
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;
    authenticate(&state, &token, request, next).await
}

/// Como `auth_middleware`, pero acepta también `?access_token=` porque
/// EventSource no puede enviar headers. Sólo para el stream SSE.
pub async fn stream_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match header_token(&request)? {
        Some(token) => token,
        None => query_token(&request)
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?,
    };
    authenticate(&state, &token, request, next).await
}

async fn authenticate(
    state: &AppState,
    token: &str,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = verify_token(token, state.auth_service.jwt_config())
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    if state.auth_service.is_revoked(&claims.jti).await {
        return Err(AppError::Unauthorized("Sesión cerrada".to_string()));
    }

    let authenticated_user = AuthenticatedUser {
        user_id: claims.sub.clone(),
        claims,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

fn header_token(request: &Request) -> Result<Option<String>, AppError> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|auth_header| extract_token_from_header(auth_header).map(str::to_string))
        .transpose()
}

fn query_token(request: &Request) -> Option<String> {
    request.uri().query().and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "access_token")
            .map(|(_, value)| value.to_string())
            .filter(|token| !token.is_empty())
    })
}
