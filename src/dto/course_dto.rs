use serde::Deserialize;
use validator::Validate;

use crate::model::course::MinimumSkill;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(length(min = 1, message = "Please add a course title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[validate(range(min = 1, message = "Please add number of weeks"))]
    pub weeks: i32,
    #[validate(range(min = 0.0, message = "Tuition cost can not be negative"))]
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarship_available: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 1, message = "Course title can not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description can not be empty"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Number of weeks must be at least 1"))]
    pub weeks: Option<i32>,
    #[validate(range(min = 0.0, message = "Tuition cost can not be negative"))]
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}
