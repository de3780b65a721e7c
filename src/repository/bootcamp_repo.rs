use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use tracing::{debug, instrument};

use crate::model::bootcamp::Bootcamp;
use crate::query::CompiledQuery;
use crate::repository::mongo_client::{MongoDatabase, BOOTCAMPS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Mean Earth radius in miles; converts a distance into `$centerSphere` radians
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

#[async_trait]
pub trait BootcampRepository: Send + Sync {
    async fn insert(&self, bootcamp: Bootcamp) -> RepositoryResult<Bootcamp>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Bootcamp>>;
    /// Raw documents so that projections can drop required fields
    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>>;
    async fn count(&self, filter: Document) -> RepositoryResult<u64>;
    async fn count_by_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
    async fn update(&self, bootcamp: &Bootcamp) -> RepositoryResult<()>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    /// `None` removes the field
    async fn set_average_cost(&self, id: &ObjectId, average_cost: Option<i64>) -> RepositoryResult<()>;
    async fn set_photo(&self, id: &ObjectId, photo: &str) -> RepositoryResult<()>;
    /// Bootcamps whose location lies within `radius` radians of `[lng, lat]`
    async fn find_within_radius(&self, lng: f64, lat: f64, radius: f64) -> RepositoryResult<Vec<Bootcamp>>;
}

pub struct MongoBootcampRepository {
    collection: Collection<Bootcamp>,
}

impl MongoBootcampRepository {
    pub fn new(db: &MongoDatabase) -> Self {
        MongoBootcampRepository { collection: db.collection::<Bootcamp>(BOOTCAMPS) }
    }

    fn raw(&self) -> Collection<Document> {
        self.collection.clone_with_type::<Document>()
    }
}

/// `$set` for a known average, `$unset` once a bootcamp has no courses
pub(crate) fn average_cost_update(average_cost: Option<i64>) -> Document {
    match average_cost {
        Some(cost) => doc! { "$set": { "averageCost": cost } },
        None => doc! { "$unset": { "averageCost": "" } },
    }
}

pub(crate) fn within_radius_filter(lng: f64, lat: f64, radius: f64) -> Document {
    doc! {
        "location": {
            "$geoWithin": { "$centerSphere": [[lng, lat], radius] }
        }
    }
}

pub(crate) fn find_options(query: &CompiledQuery) -> FindOptions {
    FindOptions::builder()
        .sort(query.sort.clone())
        .projection(query.projection.clone())
        .skip(Some(query.skip))
        .limit((query.limit > 0).then_some(query.limit))
        .build()
}

#[async_trait]
impl BootcampRepository for MongoBootcampRepository {
    #[instrument(skip(self, bootcamp), fields(name = %bootcamp.name))]
    async fn insert(&self, mut bootcamp: Bootcamp) -> RepositoryResult<Bootcamp> {
        bootcamp.id = Some(ObjectId::new());
        self.collection.insert_one(&bootcamp, None).await?;
        debug!("Inserted bootcamp {:?}", bootcamp.id);
        Ok(bootcamp)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Bootcamp>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>> {
        let cursor = self.raw().find(query.filter.clone(), find_options(query)).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        Ok(self.collection.count_documents(filter, None).await?)
    }

    async fn count_by_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.collection.count_documents(doc! { "user": user_id }, None).await?)
    }

    #[instrument(skip(self, bootcamp))]
    async fn update(&self, bootcamp: &Bootcamp) -> RepositoryResult<()> {
        let id = bootcamp.id.ok_or_else(|| RepositoryError::validation("Cannot update a bootcamp without id"))?;
        let result = self.collection.replace_one(doc! { "_id": id }, bootcamp, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No bootcamp found for ID: {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn set_average_cost(&self, id: &ObjectId, average_cost: Option<i64>) -> RepositoryResult<()> {
        self.collection
            .update_one(doc! { "_id": id }, average_cost_update(average_cost), None)
            .await?;
        Ok(())
    }

    async fn set_photo(&self, id: &ObjectId, photo: &str) -> RepositoryResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "photo": photo } }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No bootcamp found for ID: {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_within_radius(&self, lng: f64, lat: f64, radius: f64) -> RepositoryResult<Vec<Bootcamp>> {
        let cursor = self.collection.find(within_radius_filter(lng, lat, radius), None).await?;
        Ok(cursor.try_collect().await?)
    }
}
