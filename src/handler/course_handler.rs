use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::dto::course_dto::{CreateCourseRequest, UpdateCourseRequest};
use crate::dto::response::{DataResponse, ListResponse};
use crate::handler::{documents_json, model_json};
use crate::model::user::AuthUser;
use crate::service::course_service::CourseService;
use crate::util::error::HandlerError;
use crate::util::extract::ValidatedJson;
use crate::util::json::document_to_json;

pub type CourseState = Arc<dyn CourseService>;

// GET /courses
pub async fn list_courses_handler(
    State(service): State<CourseState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list(&query).await?;
    Ok(Json(ListResponse::new(documents_json(page.data), Some(page.pagination))))
}

// GET /bootcamps/{id}/courses
pub async fn list_bootcamp_courses_handler(
    State(service): State<CourseState>,
    Path(bootcamp_id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list_for_bootcamp(&bootcamp_id, &query).await?;
    Ok(Json(ListResponse::new(documents_json(page.data), Some(page.pagination))))
}

// GET /courses/{id}
pub async fn get_course_handler(
    State(service): State<CourseState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let course = service.get(&id).await?;
    Ok(Json(DataResponse::new(document_to_json(course))))
}

// POST /bootcamps/{id}/courses
pub async fn create_course_handler(
    State(service): State<CourseState>,
    Extension(actor): Extension<AuthUser>,
    Path(bootcamp_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let course = service.create(&actor, &bootcamp_id, payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(model_json(&course)?))))
}

// PUT /courses/{id}
pub async fn update_course_handler(
    State(service): State<CourseState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let course = service.update(&actor, &id, payload).await?;
    Ok(Json(DataResponse::new(model_json(&course)?)))
}

// DELETE /courses/{id}
pub async fn delete_course_handler(
    State(service): State<CourseState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete(&actor, &id).await?;
    Ok(Json(json!({ "success": true, "data": {} })))
}
