use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, DateTime, Document};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::dto::bootcamp_dto::{CreateBootcampRequest, PhotoUpload, UpdateBootcampRequest};
use crate::model::bootcamp::{slugify, Bootcamp, Location, DEFAULT_PHOTO};
use crate::model::user::{AuthUser, Role};
use crate::query::fields::BOOTCAMP_FIELDS;
use crate::query::{CompiledQuery, QueryParams};
use crate::repository::bootcamp_repo::{BootcampRepository, EARTH_RADIUS_MILES};
use crate::repository::course_repo::CourseRepository;
use crate::repository::repository_error::parse_object_id;
use crate::service::policy::ensure_can_modify;
use crate::service::ListPage;
use crate::util::error::ServiceError;
use crate::util::geocoder::{GeoLocation, GeocodeError, Geocoder};
use crate::util::photo_store::PhotoStore;

#[async_trait]
pub trait BootcampService: Send + Sync {
    /// Filtered, paginated listing; embeds `courses` unless `select` is used
    async fn list(&self, query: &[(String, String)]) -> Result<ListPage, ServiceError>;
    async fn get(&self, id: &str) -> Result<Bootcamp, ServiceError>;
    async fn create(&self, actor: &AuthUser, request: CreateBootcampRequest) -> Result<Bootcamp, ServiceError>;
    async fn update(&self, actor: &AuthUser, id: &str, request: UpdateBootcampRequest) -> Result<Bootcamp, ServiceError>;
    /// Removes the bootcamp, its courses and its photo
    async fn delete(&self, actor: &AuthUser, id: &str) -> Result<(), ServiceError>;
    /// Bootcamps within `distance` miles of the zipcode's centre
    async fn within_radius(&self, zipcode: &str, distance: &str) -> Result<Vec<Bootcamp>, ServiceError>;
    /// Stores the photo and returns its file name
    async fn upload_photo(&self, actor: &AuthUser, id: &str, upload: PhotoUpload) -> Result<String, ServiceError>;
}

pub struct BootcampServiceImpl {
    pub bootcamp_repo: Arc<dyn BootcampRepository>,
    pub course_repo: Arc<dyn CourseRepository>,
    pub geocoder: Arc<dyn Geocoder>,
    pub photo_store: Arc<dyn PhotoStore>,
    pub max_photo_bytes: usize,
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Bootcamp not found with id of {}", id))
}

impl From<GeocodeError> for ServiceError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NoResult(address) => ServiceError::InvalidInput(format!("Could not geocode {}", address)),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

fn location_from(geo: GeoLocation) -> Location {
    Location {
        formatted_address: geo.formatted_address,
        street: geo.street,
        city: geo.city,
        state: geo.state,
        zipcode: geo.zipcode,
        country: geo.country,
        ..Location::point(geo.lng, geo.lat)
    }
}

impl BootcampServiceImpl {
    async fn load(&self, id: &str) -> Result<(ObjectId, Bootcamp), ServiceError> {
        let oid = parse_object_id(id)?;
        let bootcamp = self.bootcamp_repo.find_by_id(&oid).await?.ok_or_else(|| not_found(id))?;
        Ok((oid, bootcamp))
    }

    /// Attaches each bootcamp's courses as a `courses` array
    async fn embed_courses(&self, bootcamps: &mut [Document]) -> Result<(), ServiceError> {
        let ids: Vec<ObjectId> = bootcamps.iter().filter_map(|b| b.get_object_id("_id").ok()).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let courses = self
            .course_repo
            .find_many(&CompiledQuery::filter_only(doc! { "bootcamp": { "$in": ids } }))
            .await?;

        let mut by_bootcamp: HashMap<ObjectId, Vec<Bson>> = HashMap::new();
        for course in courses {
            if let Ok(bootcamp_id) = course.get_object_id("bootcamp") {
                by_bootcamp.entry(bootcamp_id).or_default().push(Bson::Document(course));
            }
        }

        for bootcamp in bootcamps.iter_mut() {
            let courses = bootcamp
                .get_object_id("_id")
                .ok()
                .and_then(|id| by_bootcamp.remove(&id))
                .unwrap_or_default();
            bootcamp.insert("courses", courses);
        }
        Ok(())
    }
}

#[async_trait]
impl BootcampService for BootcampServiceImpl {
    #[instrument(skip(self))]
    async fn list(&self, query: &[(String, String)]) -> Result<ListPage, ServiceError> {
        let params = QueryParams::parse(query, &BOOTCAMP_FIELDS)?;
        let compiled = params.compile();

        let total = self.bootcamp_repo.count(compiled.filter.clone()).await?;
        let mut data = self.bootcamp_repo.find_many(&compiled).await?;
        if !params.has_select() {
            self.embed_courses(&mut data).await?;
        }

        Ok(ListPage { data, pagination: params.pagination(total) })
    }

    async fn get(&self, id: &str) -> Result<Bootcamp, ServiceError> {
        self.load(id).await.map(|(_, bootcamp)| bootcamp)
    }

    #[instrument(skip(self, request), fields(user = %actor.id, name = %request.name))]
    async fn create(&self, actor: &AuthUser, request: CreateBootcampRequest) -> Result<Bootcamp, ServiceError> {
        if actor.role != Role::Admin && self.bootcamp_repo.count_by_user(&actor.id).await? > 0 {
            return Err(ServiceError::InvalidInput(format!(
                "The user with ID {} has already published a bootcamp",
                actor.id.to_hex()
            )));
        }

        let geo = self.geocoder.geocode(&request.address).await?;

        let bootcamp = Bootcamp {
            id: None,
            slug: slugify(&request.name),
            name: request.name,
            description: request.description,
            website: request.website,
            phone: request.phone,
            email: request.email,
            location: Some(location_from(geo)),
            careers: request.careers,
            average_cost: None,
            photo: DEFAULT_PHOTO.to_string(),
            housing: request.housing,
            job_assistance: request.job_assistance,
            job_guarantee: request.job_guarantee,
            accept_gi: request.accept_gi,
            created_at: DateTime::now(),
            user: actor.id,
        };

        let created = self.bootcamp_repo.insert(bootcamp).await?;
        info!("Bootcamp created");
        Ok(created)
    }

    #[instrument(skip(self, request), fields(user = %actor.id))]
    async fn update(&self, actor: &AuthUser, id: &str, request: UpdateBootcampRequest) -> Result<Bootcamp, ServiceError> {
        let (_, mut bootcamp) = self.load(id).await?;
        ensure_can_modify(actor, &bootcamp.user, "update this bootcamp")?;

        if let Some(address) = request.address {
            let geo = self.geocoder.geocode(&address).await?;
            bootcamp.location = Some(location_from(geo));
        }
        if let Some(name) = request.name {
            bootcamp.slug = slugify(&name);
            bootcamp.name = name;
        }
        if let Some(description) = request.description {
            bootcamp.description = description;
        }
        if request.website.is_some() {
            bootcamp.website = request.website;
        }
        if request.phone.is_some() {
            bootcamp.phone = request.phone;
        }
        if request.email.is_some() {
            bootcamp.email = request.email;
        }
        if let Some(careers) = request.careers {
            bootcamp.careers = careers;
        }
        bootcamp.housing = request.housing.unwrap_or(bootcamp.housing);
        bootcamp.job_assistance = request.job_assistance.unwrap_or(bootcamp.job_assistance);
        bootcamp.job_guarantee = request.job_guarantee.unwrap_or(bootcamp.job_guarantee);
        bootcamp.accept_gi = request.accept_gi.unwrap_or(bootcamp.accept_gi);

        self.bootcamp_repo.update(&bootcamp).await?;
        info!("Bootcamp updated");
        Ok(bootcamp)
    }

    #[instrument(skip(self), fields(user = %actor.id))]
    async fn delete(&self, actor: &AuthUser, id: &str) -> Result<(), ServiceError> {
        let (oid, bootcamp) = self.load(id).await?;
        ensure_can_modify(actor, &bootcamp.user, "delete this bootcamp")?;

        let removed = self.course_repo.delete_by_bootcamp(&oid).await?;
        self.bootcamp_repo.delete(&oid).await?;
        info!("Bootcamp deleted along with {} courses", removed);

        if bootcamp.photo != DEFAULT_PHOTO {
            if let Err(e) = self.photo_store.delete(&bootcamp.photo).await {
                warn!("Failed to remove photo {}: {}", bootcamp.photo, e);
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn within_radius(&self, zipcode: &str, distance: &str) -> Result<Vec<Bootcamp>, ServiceError> {
        let miles = distance
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| ServiceError::InvalidInput(format!("Invalid distance: {}", distance)))?;

        let centre = self.geocoder.geocode(zipcode).await?;
        let radius = miles / EARTH_RADIUS_MILES;

        Ok(self.bootcamp_repo.find_within_radius(centre.lng, centre.lat, radius).await?)
    }

    #[instrument(skip(self, upload), fields(user = %actor.id, size = upload.bytes.len()))]
    async fn upload_photo(&self, actor: &AuthUser, id: &str, upload: PhotoUpload) -> Result<String, ServiceError> {
        let (oid, bootcamp) = self.load(id).await?;
        ensure_can_modify(actor, &bootcamp.user, "update this bootcamp")?;

        if upload.bytes.is_empty() {
            return Err(ServiceError::InvalidInput("Please upload a file".to_string()));
        }
        if !upload.content_type.starts_with("image/") {
            return Err(ServiceError::InvalidInput("Please upload an image file".to_string()));
        }
        if upload.bytes.len() > self.max_photo_bytes {
            return Err(ServiceError::InvalidInput(format!(
                "Please upload an image less than {} bytes",
                self.max_photo_bytes
            )));
        }

        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        let name = format!("photo_{}{}", oid.to_hex(), extension);

        self.photo_store.save(&name, &upload.bytes).await.map_err(|e| {
            error!("Failed to store photo: {}", e);
            ServiceError::Upstream("Problem with file upload".to_string())
        })?;
        self.bootcamp_repo.set_photo(&oid, &name).await?;
        info!("Photo {} uploaded", name);
        Ok(name)
    }
}
