use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use std::sync::Arc;

use crate::dto::auth_dto::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateDetailsRequest,
    UpdatePasswordRequest,
};
use crate::dto::response::{DataResponse, TokenResponse};
use crate::handler::model_json;
use crate::middlewares::auth_middleware::TOKEN_COOKIE;
use crate::model::user::AuthUser;
use crate::service::user_service::UserService;
use crate::util::error::HandlerError;
use crate::util::extract::ValidatedJson;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<dyn UserService>,
    pub cookie_days: i64,
    pub secure_cookie: bool,
}

/// Every flow that issues a session answers through here: `{ success, token }`
/// plus an HttpOnly `token` cookie
fn send_token_response(state: &AuthHandlerState, jar: CookieJar, status: StatusCode, token: String) -> impl IntoResponse {
    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .http_only(true)
        .secure(state.secure_cookie)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(state.cookie_days));

    (status, jar.add(cookie), Json(TokenResponse { success: true, token }))
}

// POST /auth/register
pub async fn register_handler(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let token = state.user_service.register(payload).await?;
    Ok(send_token_response(&state, jar, StatusCode::OK, token))
}

// POST /auth/login
pub async fn login_handler(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let token = state.user_service.login(&payload.email, &payload.password).await?;
    Ok(send_token_response(&state, jar, StatusCode::OK, token))
}

// GET /auth/logout
pub async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    // Overwritten with a placeholder the auth middleware ignores
    let cookie = Cookie::build((TOKEN_COOKIE, "none"))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(10));
    (jar.add(cookie), Json(json!({ "success": true, "data": {} })))
}

// GET /auth/me
pub async fn me_handler(
    State(state): State<AuthHandlerState>,
    Extension(actor): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = state.user_service.me(&actor).await?;
    Ok(Json(DataResponse::new(model_json(&user)?)))
}

// PUT /auth/updatedetails
pub async fn update_details_handler(
    State(state): State<AuthHandlerState>,
    Extension(actor): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateDetailsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = state.user_service.update_details(&actor, payload).await?;
    Ok(Json(DataResponse::new(model_json(&user)?)))
}

// PUT /auth/updatepassword
pub async fn update_password_handler(
    State(state): State<AuthHandlerState>,
    Extension(actor): Extension<AuthUser>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let token = state
        .user_service
        .update_password(&actor, &payload.current_password, &payload.new_password)
        .await?;
    Ok(send_token_response(&state, jar, StatusCode::OK, token))
}

// POST /auth/forgotpassword
pub async fn forgot_password_handler(
    State(state): State<AuthHandlerState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    state.user_service.forgot_password(&payload.email).await?;
    Ok(Json(DataResponse::new("Email sent")))
}

// PUT /auth/resetpassword/{token}
pub async fn reset_password_handler(
    State(state): State<AuthHandlerState>,
    Path(token): Path<String>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let token = state.user_service.reset_password(&token, &payload.password).await?;
    Ok(send_token_response(&state, jar, StatusCode::OK, token))
}
