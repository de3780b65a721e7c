use axum::{Router, routing::{get, post, put}, middleware};
use crate::handler::course_handler::{
    CourseState,
    list_courses_handler,
    list_bootcamp_courses_handler,
    get_course_handler,
    create_course_handler,
    update_course_handler,
    delete_course_handler,
};
use std::sync::Arc;
use crate::middlewares::auth_middleware::{protect, require_publisher, AuthState};

pub fn course_router(service: CourseState, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/courses", get(list_courses_handler))
        .route("/courses/{id}", get(get_course_handler))
        .route("/bootcamps/{id}/courses", get(list_bootcamp_courses_handler));

    let publisher = Router::new()
        .route("/bootcamps/{id}/courses", post(create_course_handler))
        .route("/courses/{id}", put(update_course_handler).delete(delete_course_handler))
        .route_layer(middleware::from_fn(require_publisher))
        .route_layer(middleware::from_fn_with_state(auth_state, protect));

    public
        .merge(publisher)
        .with_state(service)
}
