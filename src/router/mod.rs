pub mod auth_router;
pub mod bootcamp_router;
pub mod course_router;
