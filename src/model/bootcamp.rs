use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Other")]
    Other,
}

/// GeoJSON point plus the address parts the geocoder resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]`
    pub coordinates: Vec<f64>,
    pub formatted_address: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn point(lng: f64, lat: f64) -> Self {
        Location {
            kind: "Point".to_string(),
            coordinates: vec![lng, lat],
            formatted_address: String::new(),
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        }
    }

    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat] => Some((*lng, *lat)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    pub careers: Vec<Career>,
    /// Rounded-up mean course tuition; absent while the bootcamp has no courses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<i64>,
    #[serde(default = "default_photo")]
    pub photo: String,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
    pub created_at: DateTime,
    pub user: ObjectId,
}

fn default_photo() -> String {
    DEFAULT_PHOTO.to_string()
}

/// URL-friendly form of a bootcamp name: lowercase ASCII words joined by `-`
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
