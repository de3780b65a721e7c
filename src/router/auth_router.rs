use axum::{Router, routing::{get, post, put}, middleware};
use crate::handler::auth_handler::{
    AuthHandlerState,
    register_handler,
    login_handler,
    logout_handler,
    me_handler,
    update_details_handler,
    update_password_handler,
    forgot_password_handler,
    reset_password_handler,
};
use std::sync::Arc;
use crate::middlewares::auth_middleware::{protect, AuthState};

pub fn auth_router(state: AuthHandlerState, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", get(logout_handler))
        .route("/auth/forgotpassword", post(forgot_password_handler))
        .route("/auth/resetpassword/{token}", put(reset_password_handler));

    // Signed-in user routes
    let protected = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/auth/updatedetails", put(update_details_handler))
        .route("/auth/updatepassword", put(update_password_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, protect));

    public
        .merge(protected)
        .with_state(state)
}
