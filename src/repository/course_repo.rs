use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::{debug, instrument};

use crate::model::course::Course;
use crate::query::CompiledQuery;
use crate::repository::bootcamp_repo::find_options;
use crate::repository::mongo_client::{MongoDatabase, COURSES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Groups a bootcamp's courses into a single `averageCost` document
pub(crate) fn average_tuition_pipeline(bootcamp_id: &ObjectId) -> Vec<Document> {
    vec![
        doc! { "$match": { "bootcamp": bootcamp_id } },
        doc! { "$group": { "_id": "$bootcamp", "averageCost": { "$avg": "$tuition" } } },
    ]
}

pub(crate) fn read_average(group: &Document) -> Option<f64> {
    match group.get("averageCost") {
        Some(Bson::Double(avg)) => Some(*avg),
        Some(Bson::Int32(avg)) => Some(f64::from(*avg)),
        Some(Bson::Int64(avg)) => Some(*avg as f64),
        _ => None,
    }
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert(&self, course: Course) -> RepositoryResult<Course>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>>;
    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>>;
    async fn count(&self, filter: Document) -> RepositoryResult<u64>;
    async fn update(&self, course: &Course) -> RepositoryResult<()>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn delete_by_bootcamp(&self, bootcamp_id: &ObjectId) -> RepositoryResult<u64>;
    /// Mean tuition of a bootcamp's courses; `None` when it has none
    async fn average_tuition(&self, bootcamp_id: &ObjectId) -> RepositoryResult<Option<f64>>;
}

pub struct MongoCourseRepository {
    collection: Collection<Course>,
}

impl MongoCourseRepository {
    pub fn new(db: &MongoDatabase) -> Self {
        MongoCourseRepository { collection: db.collection::<Course>(COURSES) }
    }
}

#[async_trait]
impl CourseRepository for MongoCourseRepository {
    #[instrument(skip(self, course), fields(title = %course.title))]
    async fn insert(&self, mut course: Course) -> RepositoryResult<Course> {
        course.id = Some(ObjectId::new());
        self.collection.insert_one(&course, None).await?;
        debug!("Inserted course {:?}", course.id);
        Ok(course)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Course>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, query: &CompiledQuery) -> RepositoryResult<Vec<Document>> {
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(query.filter.clone(), find_options(query))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        Ok(self.collection.count_documents(filter, None).await?)
    }

    #[instrument(skip(self, course))]
    async fn update(&self, course: &Course) -> RepositoryResult<()> {
        let id = course.id.ok_or_else(|| RepositoryError::validation("Cannot update a course without id"))?;
        let result = self.collection.replace_one(doc! { "_id": id }, course, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No course found for ID: {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_bootcamp(&self, bootcamp_id: &ObjectId) -> RepositoryResult<u64> {
        let result = self.collection.delete_many(doc! { "bootcamp": bootcamp_id }, None).await?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn average_tuition(&self, bootcamp_id: &ObjectId) -> RepositoryResult<Option<f64>> {
        let mut cursor = self.collection.aggregate(average_tuition_pipeline(bootcamp_id), None).await?;
        let group = cursor.try_next().await?;
        Ok(group.as_ref().and_then(read_average))
    }
}
