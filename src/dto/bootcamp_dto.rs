use serde::Deserialize;
use validator::Validate;

use crate::model::bootcamp::Career;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcampRequest {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, max = 50, message = "Name is required and can not be more than 50 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "Description is required and can not be more than 500 characters"))]
    pub description: String,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Please add an address"))]
    pub address: String,
    #[validate(length(min = 1, message = "Please add at least one career"))]
    pub careers: Vec<Career>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcampRequest {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, max = 50, message = "Name can not be empty or more than 50 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Description can not be empty or more than 500 characters"))]
    pub description: Option<String>,
    #[validate(url(message = "Please use a valid URL with HTTP or HTTPS"))]
    pub website: Option<String>,
    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Address can not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "Please add at least one career"))]
    pub careers: Option<Vec<Career>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

/// A photo taken from a multipart upload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
