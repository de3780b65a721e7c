pub mod bootcamp_service;
pub mod course_service;
pub mod policy;
pub mod user_service;

use bson::Document;

use crate::query::{Pagination, QueryError};
use crate::util::error::ServiceError;

/// One page of a list endpoint, still in storage form
#[derive(Debug, Clone)]
pub struct ListPage {
    pub data: Vec<Document>,
    pub pagination: Pagination,
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}
