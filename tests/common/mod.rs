//! In-memory stand-ins for MongoDB, SMTP, MapQuest and the photo directory,
//! plus a router wired around them.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bson::oid::ObjectId;
use bson::{doc, Bson, DateTime, Document};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use devcamper_backend::app::app::{build_router, AppServices};
use devcamper_backend::config::{JwtConfig, PasswordConfig, PasswordResetConfig};
use devcamper_backend::model::bootcamp::Bootcamp;
use devcamper_backend::model::course::Course;
use devcamper_backend::model::user::User;
use devcamper_backend::query::CompiledQuery;
use devcamper_backend::repository::bootcamp_repo::{BootcampRepository, EARTH_RADIUS_MILES};
use devcamper_backend::repository::course_repo::CourseRepository;
use devcamper_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use devcamper_backend::repository::user_repo::UserRepository;
use devcamper_backend::service::bootcamp_service::BootcampServiceImpl;
use devcamper_backend::service::course_service::CourseServiceImpl;
use devcamper_backend::service::user_service::UserServiceImpl;
use devcamper_backend::util::email::{EmailError, EmailSender, PasswordResetEmail};
use devcamper_backend::util::geocoder::{GeoLocation, GeocodeError, Geocoder};
use devcamper_backend::util::jwt::JwtTokenUtilsImpl;
use devcamper_backend::util::password::PasswordUtilsImpl;
use devcamper_backend::util::photo_store::{PhotoStore, PhotoStoreError};
use devcamper_backend::util::reset_token::ResetTokenGenerator;

pub const MAX_UPLOAD_BYTES: usize = 1024;

// ---------------------------------------------------------------------------
// Document matching, close enough to MongoDB for the queries the services build
// ---------------------------------------------------------------------------

fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(*i as f64),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn equals(field: Option<&Bson>, expected: &Bson) -> bool {
    match field {
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| compare(item, expected) == Some(Ordering::Equal))
        }
        Some(value) => compare(value, expected) == Some(Ordering::Equal) || value == expected,
        None => matches!(expected, Bson::Null),
    }
}

fn satisfies(field: Option<&Bson>, op: &str, operand: &Bson) -> bool {
    let ordered = |accept: fn(Ordering) -> bool| {
        let check = |v: &Bson| compare(v, operand).map(accept).unwrap_or(false);
        match field {
            Some(Bson::Array(items)) => items.iter().any(check),
            Some(value) => check(value),
            None => false,
        }
    };
    match op {
        "$eq" => equals(field, operand),
        "$gt" => ordered(|o| o == Ordering::Greater),
        "$gte" => ordered(|o| o != Ordering::Less),
        "$lt" => ordered(|o| o == Ordering::Less),
        "$lte" => ordered(|o| o != Ordering::Greater),
        "$in" => operand
            .as_array()
            .map(|candidates| candidates.iter().any(|c| equals(field, c)))
            .unwrap_or(false),
        other => panic!("unsupported operator in test store: {}", other),
    }
}

pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let field = lookup(doc, key);
        match condition {
            Bson::Document(ops) if ops.keys().next().map_or(false, |k| k.starts_with('$')) => {
                ops.iter().all(|(op, operand)| satisfies(field, op, operand))
            }
            expected => equals(field, expected),
        }
    })
}

fn sort_documents(docs: &mut [Document], sort: &Document) {
    docs.sort_by(|a, b| {
        for (field, direction) in sort {
            let descending = as_number(direction).map_or(false, |d| d < 0.0);
            let ordering = match (lookup(a, field), lookup(b, field)) {
                (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            let ordering = if descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn project(doc: Document, projection: &Document) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get("_id") {
        out.insert("_id", id.clone());
    }
    for (field, _) in projection {
        if let Some(value) = doc.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    out
}

/// One collection's worth of documents
#[derive(Default)]
pub struct MemoryCollection {
    docs: Mutex<Vec<Document>>,
    unique: Option<&'static str>,
}

impl MemoryCollection {
    pub fn with_unique(field: &'static str) -> Self {
        MemoryCollection { docs: Mutex::new(Vec::new()), unique: Some(field) }
    }

    pub fn insert(&self, mut doc: Document) -> RepositoryResult<ObjectId> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(field) = self.unique {
            if docs.iter().any(|d| d.get(field).is_some() && d.get(field) == doc.get(field)) {
                return Err(RepositoryError::already_exists(format!("duplicate {}", field)));
            }
        }
        let id = ObjectId::new();
        doc.insert("_id", id);
        docs.push(doc);
        Ok(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<Document> {
        self.docs.lock().unwrap().iter().find(|d| d.get_object_id("_id").ok() == Some(*id)).cloned()
    }

    pub fn replace(&self, doc: Document) -> RepositoryResult<()> {
        let id = doc.get_object_id("_id").map_err(|_| RepositoryError::validation("missing _id"))?;
        let mut docs = self.docs.lock().unwrap();
        let slot = docs
            .iter_mut()
            .find(|d| d.get_object_id("_id").ok() == Some(id))
            .ok_or_else(|| RepositoryError::not_found("document not found"))?;
        *slot = doc;
        Ok(())
    }

    pub fn modify(&self, id: &ObjectId, change: impl FnOnce(&mut Document)) -> RepositoryResult<()> {
        let mut docs = self.docs.lock().unwrap();
        let slot = docs
            .iter_mut()
            .find(|d| d.get_object_id("_id").ok() == Some(*id))
            .ok_or_else(|| RepositoryError::not_found("document not found"))?;
        change(slot);
        Ok(())
    }

    pub fn remove_where(&self, filter: &Document) -> u64 {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| !matches(d, filter));
        (before - docs.len()) as u64
    }

    pub fn filter(&self, filter: &Document) -> Vec<Document> {
        self.docs.lock().unwrap().iter().filter(|d| matches(d, filter)).cloned().collect()
    }

    pub fn query(&self, query: &CompiledQuery) -> Vec<Document> {
        let mut found = self.filter(&query.filter);
        sort_documents(&mut found, &query.sort);
        let found = found.into_iter().skip(query.skip as usize);
        let found: Vec<Document> = if query.limit > 0 { found.take(query.limit as usize).collect() } else { found.collect() };
        match &query.projection {
            Some(projection) => found.into_iter().map(|d| project(d, projection)).collect(),
            None => found,
        }
    }

    pub fn all(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

fn to_doc<T: serde::Serialize>(value: &T) -> RepositoryResult<Document> {
    bson::to_document(value).map_err(|e| RepositoryError::serialization(e.to_string()))
}

fn from_doc<T: serde::de::DeserializeOwned>(doc: Document) -> RepositoryResult<T> {
    bson::from_document(doc).map_err(|e| RepositoryError::serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

pub struct MemoryUserRepository {
    pub users: MemoryCollection,
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        MemoryUserRepository { users: MemoryCollection::with_unique("email") }
    }
}

impl MemoryUserRepository {
    pub fn stored(&self, email: &str) -> Option<User> {
        self.users
            .filter(&doc! { "email": email.to_lowercase() })
            .into_iter()
            .next()
            .and_then(|d| from_doc(d).ok())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let id = self.users.insert(to_doc(&user)?)?;
        user.id = Some(id);
        Ok(user)
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        self.users.replace(to_doc(user)?)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.stored(email))
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        self.users.get(id).map(from_doc).transpose()
    }

    async fn find_by_reset_token(&self, hashed_token: &str, now: DateTime) -> RepositoryResult<Option<User>> {
        let filter = doc! { "resetPasswordToken": hashed_token, "resetPasswordExpire": { "$gt": now } };
        self.users.filter(&filter).into_iter().next().map(from_doc).transpose()
    }
}

pub struct MemoryBootcampRepository {
    pub bootcamps: MemoryCollection,
}

impl Default for MemoryBootcampRepository {
    fn default() -> Self {
        MemoryBootcampRepository { bootcamps: MemoryCollection::with_unique("name") }
    }
}

impl MemoryBootcampRepository {
    pub fn stored(&self, id: &ObjectId) -> Option<Bootcamp> {
        self.bootcamps.get(id).and_then(|d| from_doc(d).ok())
    }
}

fn haversine_radians(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lng1, lat1) = (a.0.to_radians(), a.1.to_radians());
    let (lng2, lat2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * ((lng2 - lng1) / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin()
}

#[async_trait]
impl BootcampRepository for MemoryBootcampRepository {
    async fn insert(&self, mut bootcamp: Bootcamp) -> RepositoryResult<Bootcamp> {
        let id = self.bootcamps.insert(to_doc(&bootcamp)?)?;
        bootcamp.id = Some(id);
        Ok(bootcamp)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Bootcamp>> {
        self.bootcamps.get(id).map(from_doc).transpose()
    }

    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>> {
        Ok(self.bootcamps.query(query))
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        Ok(self.bootcamps.filter(&filter).len() as u64)
    }

    async fn count_by_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.bootcamps.filter(&doc! { "user": *user_id }).len() as u64)
    }

    async fn update(&self, bootcamp: &Bootcamp) -> RepositoryResult<()> {
        self.bootcamps.replace(to_doc(bootcamp)?)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        Ok(self.bootcamps.remove_where(&doc! { "_id": *id }) > 0)
    }

    async fn set_average_cost(&self, id: &ObjectId, average_cost: Option<i64>) -> RepositoryResult<()> {
        self.bootcamps.modify(id, |doc| match average_cost {
            Some(cost) => {
                doc.insert("averageCost", cost);
            }
            None => {
                doc.remove("averageCost");
            }
        })
    }

    async fn set_photo(&self, id: &ObjectId, photo: &str) -> RepositoryResult<()> {
        self.bootcamps.modify(id, |doc| {
            doc.insert("photo", photo);
        })
    }

    async fn find_within_radius(&self, lng: f64, lat: f64, radius: f64) -> RepositoryResult<Vec<Bootcamp>> {
        self.bootcamps
            .all()
            .into_iter()
            .map(from_doc::<Bootcamp>)
            .filter(|b| match b {
                Ok(bootcamp) => bootcamp
                    .location
                    .as_ref()
                    .and_then(|l| l.lng_lat())
                    .map_or(false, |point| haversine_radians(point, (lng, lat)) <= radius),
                Err(_) => true,
            })
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryCourseRepository {
    pub courses: MemoryCollection,
}

impl MemoryCourseRepository {
    pub fn stored(&self, id: &ObjectId) -> Option<Course> {
        self.courses.get(id).and_then(|d| from_doc(d).ok())
    }
}

#[async_trait]
impl CourseRepository for MemoryCourseRepository {
    async fn insert(&self, mut course: Course) -> RepositoryResult<Course> {
        let id = self.courses.insert(to_doc(&course)?)?;
        course.id = Some(id);
        Ok(course)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>> {
        self.courses.get(id).map(from_doc).transpose()
    }

    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>> {
        Ok(self.courses.query(query))
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        Ok(self.courses.filter(&filter).len() as u64)
    }

    async fn update(&self, course: &Course) -> RepositoryResult<()> {
        self.courses.replace(to_doc(course)?)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        Ok(self.courses.remove_where(&doc! { "_id": *id }) > 0)
    }

    async fn delete_by_bootcamp(&self, bootcamp_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.courses.remove_where(&doc! { "bootcamp": *bootcamp_id }))
    }

    async fn average_tuition(&self, bootcamp_id: &ObjectId) -> RepositoryResult<Option<f64>> {
        let tuitions: Vec<f64> = self
            .courses
            .filter(&doc! { "bootcamp": *bootcamp_id })
            .iter()
            .filter_map(|d| d.get("tuition").and_then(as_number))
            .collect();
        if tuitions.is_empty() {
            return Ok(None);
        }
        Ok(Some(tuitions.iter().sum::<f64>() / tuitions.len() as f64))
    }
}

// ---------------------------------------------------------------------------
// External services
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<PasswordResetEmail>>,
    pub fail: AtomicBool,
}

impl RecordingEmailSender {
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, AtomicOrdering::SeqCst);
    }

    /// Raw token from the most recent reset link
    pub fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.last().and_then(|email| email.reset_url.rsplit('/').next().map(str::to_string))
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_password_reset_email(&self, email: PasswordResetEmail) -> Result<(), EmailError> {
        if self.fail.load(AtomicOrdering::SeqCst) {
            return Err(EmailError::SmtpError("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Known addresses resolve, everything else has no result
pub struct StaticGeocoder {
    known: HashMap<String, GeoLocation>,
}

pub fn location(lng: f64, lat: f64, city: &str, zipcode: &str) -> GeoLocation {
    GeoLocation {
        lat,
        lng,
        formatted_address: format!("{} {}", city, zipcode),
        street: None,
        city: Some(city.to_string()),
        state: Some("MA".to_string()),
        zipcode: Some(zipcode.to_string()),
        country: Some("US".to_string()),
    }
}

pub const BOSTON: &str = "233 Bay State Rd Boston MA 02215";
pub const LOWELL: &str = "220 Pawtucket St Lowell MA 01854";
pub const LOS_ANGELES: &str = "1 World Way Los Angeles CA 90045";

impl Default for StaticGeocoder {
    fn default() -> Self {
        let mut known = HashMap::new();
        known.insert(BOSTON.to_string(), location(-71.104081, 42.350846, "Boston", "02215"));
        known.insert("02215".to_string(), location(-71.104081, 42.350846, "Boston", "02215"));
        known.insert(LOWELL.to_string(), location(-71.324239, 42.639444, "Lowell", "01854"));
        known.insert(LOS_ANGELES.to_string(), location(-118.408530, 33.941589, "Los Angeles", "90045"));
        StaticGeocoder { known }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        self.known.get(address).cloned().ok_or_else(|| GeocodeError::NoResult(address.to_string()))
    }
}

#[derive(Default)]
pub struct MemoryPhotoStore {
    pub photos: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl PhotoStore for MemoryPhotoStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        self.photos.lock().unwrap().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), PhotoStoreError> {
        self.photos.lock().unwrap().remove(name);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Router harness
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserRepository>,
    pub bootcamps: Arc<MemoryBootcampRepository>,
    pub courses: Arc<MemoryCourseRepository>,
    pub email: Arc<RecordingEmailSender>,
    pub photos: Arc<MemoryPhotoStore>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<UserServiceImpl>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::default());
        let bootcamps = Arc::new(MemoryBootcampRepository::default());
        let courses = Arc::new(MemoryCourseRepository::default());
        let email = Arc::new(RecordingEmailSender::default());
        let photos = Arc::new(MemoryPhotoStore::default());
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
        let passwords = Arc::new(PasswordUtilsImpl::new(&PasswordConfig::from_test_env()).unwrap());

        let user_service = Arc::new(UserServiceImpl::new(
            users.clone(),
            jwt_utils.clone(),
            passwords,
            ResetTokenGenerator::new(PasswordResetConfig::from_test_env()),
            email.clone(),
        ));
        let bootcamp_service = Arc::new(BootcampServiceImpl {
            bootcamp_repo: bootcamps.clone(),
            course_repo: courses.clone(),
            geocoder: Arc::new(StaticGeocoder::default()),
            photo_store: photos.clone(),
            max_photo_bytes: MAX_UPLOAD_BYTES,
        });
        let course_service = Arc::new(CourseServiceImpl {
            course_repo: courses.clone(),
            bootcamp_repo: bootcamps.clone(),
        });

        let services = AppServices {
            user_service: user_service.clone(),
            bootcamp_service,
            course_service,
            jwt_utils: jwt_utils.clone(),
            cookie_days: 30,
            secure_cookie: false,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            upload_dir: PathBuf::from("./public/uploads"),
        };

        TestApp {
            router: build_router(&services),
            users,
            bootcamps,
            courses,
            email,
            photos,
            jwt_utils,
            user_service,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, set_cookie, body }
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Registers through the API and returns the session token
    pub async fn register(&self, name: &str, email: &str, role: &str) -> String {
        let body = serde_json::json!({ "name": name, "email": email, "password": "123456", "role": role });
        let response = self.call(Method::POST, "/api/v1/auth/register", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::OK, "register failed: {}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// An admin account seeded the way startup does it; returns its token
    pub async fn admin(&self) -> String {
        let config = devcamper_backend::config::AdminUserConfig {
            name: "Admin".to_string(),
            email: "admin@devcamper.io".to_string(),
            password: "admin-password".to_string(),
        };
        self.user_service.create_admin_if_missing(&config).await.unwrap();
        let body = serde_json::json!({ "email": config.email, "password": config.password });
        let response = self.call(Method::POST, "/api/v1/auth/login", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_bootcamp(&self, token: &str, name: &str, address: &str) -> String {
        let body = serde_json::json!({
            "name": name,
            "description": format!("{} teaches full stack web development", name),
            "website": "https://devworks.com",
            "email": "enroll@devworks.com",
            "address": address,
            "careers": ["Web Development", "UI/UX"],
        });
        let response = self.call(Method::POST, "/api/v1/bootcamps", Some(token), Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "create bootcamp failed: {}", response.body);
        response.body["data"]["_id"].as_str().unwrap().to_string()
    }

    pub async fn create_course(&self, token: &str, bootcamp_id: &str, title: &str, tuition: f64) -> String {
        let body = serde_json::json!({
            "title": title,
            "description": format!("{} course", title),
            "weeks": 8,
            "tuition": tuition,
            "minimumSkill": "beginner",
        });
        let uri = format!("/api/v1/bootcamps/{}/courses", bootcamp_id);
        let response = self.call(Method::POST, &uri, Some(token), Some(body)).await;
        assert_eq!(response.status, StatusCode::CREATED, "create course failed: {}", response.body);
        response.body["data"]["_id"].as_str().unwrap().to_string()
    }

    pub fn average_cost(&self, bootcamp_id: &str) -> Option<i64> {
        let id = ObjectId::parse_str(bootcamp_id).unwrap();
        self.bootcamps.stored(&id).unwrap().average_cost
    }
}

pub fn haversine_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    haversine_radians(a, b) * EARTH_RADIUS_MILES
}
