use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    middleware,
};
use crate::handler::bootcamp_handler::{
    BootcampState,
    list_bootcamps_handler,
    get_bootcamp_handler,
    create_bootcamp_handler,
    update_bootcamp_handler,
    delete_bootcamp_handler,
    bootcamps_in_radius_handler,
    upload_photo_handler,
};
use std::sync::Arc;
use crate::middlewares::auth_middleware::{protect, require_publisher, AuthState};

// Room for the multipart framing around the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn bootcamp_router(service: BootcampState, auth_state: Arc<AuthState>, max_upload_bytes: usize) -> Router {
    let public = Router::new()
        .route("/bootcamps", get(list_bootcamps_handler))
        .route("/bootcamps/{id}", get(get_bootcamp_handler))
        .route("/bootcamps/radius/{zipcode}/{distance}", get(bootcamps_in_radius_handler));

    // Publisher/admin routes; protect runs first as the outer layer
    let publisher = Router::new()
        .route("/bootcamps", post(create_bootcamp_handler))
        .route("/bootcamps/{id}", put(update_bootcamp_handler).delete(delete_bootcamp_handler))
        .route(
            "/bootcamps/{id}/photo",
            put(upload_photo_handler).layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route_layer(middleware::from_fn(require_publisher))
        .route_layer(middleware::from_fn_with_state(auth_state, protect));

    public
        .merge(publisher)
        .with_state(service)
}
