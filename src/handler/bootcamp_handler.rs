use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::dto::bootcamp_dto::{CreateBootcampRequest, PhotoUpload, UpdateBootcampRequest};
use crate::dto::response::{DataResponse, ListResponse};
use crate::handler::{documents_json, model_json};
use crate::model::user::AuthUser;
use crate::service::bootcamp_service::BootcampService;
use crate::util::error::HandlerError;
use crate::util::extract::ValidatedJson;

pub type BootcampState = Arc<dyn BootcampService>;

// GET /bootcamps
pub async fn list_bootcamps_handler(
    State(service): State<BootcampState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list(&query).await?;
    Ok(Json(ListResponse::new(documents_json(page.data), Some(page.pagination))))
}

// GET /bootcamps/{id}
pub async fn get_bootcamp_handler(
    State(service): State<BootcampState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let bootcamp = service.get(&id).await?;
    Ok(Json(DataResponse::new(model_json(&bootcamp)?)))
}

// POST /bootcamps
pub async fn create_bootcamp_handler(
    State(service): State<BootcampState>,
    Extension(actor): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateBootcampRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let bootcamp = service.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(model_json(&bootcamp)?))))
}

// PUT /bootcamps/{id}
pub async fn update_bootcamp_handler(
    State(service): State<BootcampState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBootcampRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let bootcamp = service.update(&actor, &id, payload).await?;
    Ok(Json(DataResponse::new(model_json(&bootcamp)?)))
}

// DELETE /bootcamps/{id}
pub async fn delete_bootcamp_handler(
    State(service): State<BootcampState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete(&actor, &id).await?;
    Ok(Json(json!({ "success": true, "data": {} })))
}

// GET /bootcamps/radius/{zipcode}/{distance}
pub async fn bootcamps_in_radius_handler(
    State(service): State<BootcampState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    let bootcamps = service.within_radius(&zipcode, &distance).await?;
    let data = bootcamps.iter().map(model_json).collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ListResponse::new(data, None)))
}

// PUT /bootcamps/{id}/photo
pub async fn upload_photo_handler(
    State(service): State<BootcampState>,
    Extension(actor): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Photo upload without a multipart body: {}", e);
        HandlerError::bad_request("Please upload a file")
    })?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        HandlerError::bad_request("Please upload a file")
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| HandlerError::bad_request(format!("Problem with file upload: {}", e)))?;
        upload = Some(PhotoUpload { file_name, content_type, bytes: bytes.to_vec() });
        break;
    }

    let upload = upload.ok_or_else(|| HandlerError::bad_request("Please upload a file"))?;
    let name = service.upload_photo(&actor, &id, upload).await?;
    Ok(Json(DataResponse::new(name)))
}
