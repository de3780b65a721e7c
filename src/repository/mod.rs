pub mod bootcamp_repo;
pub mod course_repo;
pub mod mongo_client;
pub mod repository_error;
pub mod user_repo;
