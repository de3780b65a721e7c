pub mod email;
pub mod error;
pub mod extract;
pub mod geocoder;
pub mod json;
pub mod jwt;
pub mod logger;
pub mod password;
pub mod photo_store;
pub mod reset_token;
