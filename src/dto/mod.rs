use serde::{Deserialize, Deserializer};

pub mod auth_dto;
pub mod bootcamp_dto;
pub mod course_dto;
pub mod response;

/// Deserializes a string with surrounding whitespace removed
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| value.map(|v| v.trim().to_string()))
}
