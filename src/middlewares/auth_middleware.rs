use axum::{body::Body, extract::State, http::header, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

use crate::model::user::{AuthUser, Role};
use crate::service::user_service::UserService;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub const TOKEN_COOKIE: &str = "token";
const NOT_AUTHORIZED: &str = "Not authorized to access this route";

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<dyn UserService>,
}

/// Session token from `Authorization: Bearer`, falling back to the `token` cookie
fn session_token(state: &AuthState, req: &Request<Body>) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| state.jwt_utils.extract_token_from_header(v).ok());

    from_header.or_else(|| {
        CookieJar::from_headers(req.headers())
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty() && v != "none")
    })
}

/// Verifies the session token, reloads the user and attaches [`AuthUser`]
pub async fn protect(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let token = session_token(&state, &req).ok_or_else(|| HandlerError::unauthorized(NOT_AUTHORIZED))?;

    let claims = state.jwt_utils.validate_token(&token).map_err(|e| {
        debug!("Rejected session token: {}", e);
        HandlerError::unauthorized(NOT_AUTHORIZED)
    })?;

    let user = state
        .user_service
        .authenticate(&claims.sub)
        .await
        .map_err(|_| HandlerError::unauthorized(NOT_AUTHORIZED))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Lets only publishers and admins through; must run after [`protect`]
pub async fn require_publisher(req: Request<Body>, next: Next) -> Result<Response, HandlerError> {
    let role = req
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.role)
        .ok_or_else(|| HandlerError::unauthorized(NOT_AUTHORIZED))?;

    if !matches!(role, Role::Publisher | Role::Admin) {
        return Err(HandlerError::forbidden(format!(
            "User role {} is not authorized to access this route",
            role
        )));
    }
    Ok(next.run(req).await)
}
