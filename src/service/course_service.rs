use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, DateTime, Document};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::dto::course_dto::{CreateCourseRequest, UpdateCourseRequest};
use crate::model::course::Course;
use crate::model::user::AuthUser;
use crate::query::fields::COURSE_FIELDS;
use crate::query::{CompiledQuery, FilterValue, QueryParams};
use crate::repository::bootcamp_repo::BootcampRepository;
use crate::repository::course_repo::CourseRepository;
use crate::repository::repository_error::{parse_object_id, RepositoryResult};
use crate::service::policy::ensure_can_modify;
use crate::service::ListPage;
use crate::util::error::ServiceError;

#[async_trait]
pub trait CourseService: Send + Sync {
    /// All courses, each with its bootcamp's name and description
    async fn list(&self, query: &[(String, String)]) -> Result<ListPage, ServiceError>;
    async fn list_for_bootcamp(&self, bootcamp_id: &str, query: &[(String, String)]) -> Result<ListPage, ServiceError>;
    async fn get(&self, id: &str) -> Result<Document, ServiceError>;
    async fn create(&self, actor: &AuthUser, bootcamp_id: &str, request: CreateCourseRequest) -> Result<Course, ServiceError>;
    async fn update(&self, actor: &AuthUser, id: &str, request: UpdateCourseRequest) -> Result<Course, ServiceError>;
    async fn delete(&self, actor: &AuthUser, id: &str) -> Result<(), ServiceError>;
}

/// Mean tuition rounded up to the next multiple of ten
pub fn round_up_to_ten(average: f64) -> i64 {
    ((average / 10.0).ceil() * 10.0) as i64
}

/// Recomputes and stores a bootcamp's `averageCost` from its current
/// courses. The field is removed when no courses remain.
pub async fn recompute_average_cost(
    courses: &dyn CourseRepository,
    bootcamps: &dyn BootcampRepository,
    bootcamp_id: &ObjectId,
) -> RepositoryResult<Option<i64>> {
    let average_cost = courses.average_tuition(bootcamp_id).await?.map(round_up_to_ten);
    bootcamps.set_average_cost(bootcamp_id, average_cost).await?;
    Ok(average_cost)
}

pub struct CourseServiceImpl {
    pub course_repo: Arc<dyn CourseRepository>,
    pub bootcamp_repo: Arc<dyn BootcampRepository>,
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("No course with the id of {}", id))
}

impl CourseServiceImpl {
    async fn load(&self, id: &str) -> Result<Course, ServiceError> {
        let oid = parse_object_id(id)?;
        self.course_repo.find_by_id(&oid).await?.ok_or_else(|| not_found(id))
    }

    /// Failures are logged, never returned: the course write already happened
    async fn refresh_average_cost(&self, bootcamp_id: &ObjectId) {
        match recompute_average_cost(self.course_repo.as_ref(), self.bootcamp_repo.as_ref(), bootcamp_id).await {
            Ok(cost) => info!("Average cost of bootcamp {} is now {:?}", bootcamp_id, cost),
            Err(e) => error!("Failed to recompute average cost of bootcamp {}: {}", bootcamp_id, e),
        }
    }

    /// Replaces each `bootcamp` id with `{ _id, name, description }`
    async fn populate_bootcamps(&self, courses: &mut [Document]) -> Result<(), ServiceError> {
        let mut ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.get_object_id("bootcamp").ok()).collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        let query = CompiledQuery::filter_only(doc! { "_id": { "$in": ids } })
            .with_projection(doc! { "name": 1, "description": 1 });
        let bootcamps: HashMap<ObjectId, Document> = self
            .bootcamp_repo
            .find_many(&query)
            .await?
            .into_iter()
            .filter_map(|b| b.get_object_id("_id").ok().map(|id| (id, b)))
            .collect();

        for course in courses.iter_mut() {
            if let Ok(id) = course.get_object_id("bootcamp") {
                let populated = bootcamps.get(&id).cloned().map(Bson::Document).unwrap_or(Bson::Null);
                course.insert("bootcamp", populated);
            }
        }
        Ok(())
    }

    async fn page(&self, params: QueryParams, populate: bool) -> Result<ListPage, ServiceError> {
        let compiled = params.compile();
        let total = self.course_repo.count(compiled.filter.clone()).await?;
        let mut data = self.course_repo.find_many(&compiled).await?;
        if populate {
            self.populate_bootcamps(&mut data).await?;
        }
        Ok(ListPage { data, pagination: params.pagination(total) })
    }
}

#[async_trait]
impl CourseService for CourseServiceImpl {
    #[instrument(skip(self))]
    async fn list(&self, query: &[(String, String)]) -> Result<ListPage, ServiceError> {
        let params = QueryParams::parse(query, &COURSE_FIELDS)?;
        self.page(params, true).await
    }

    #[instrument(skip(self))]
    async fn list_for_bootcamp(&self, bootcamp_id: &str, query: &[(String, String)]) -> Result<ListPage, ServiceError> {
        let oid = parse_object_id(bootcamp_id)?;
        if self.bootcamp_repo.find_by_id(&oid).await?.is_none() {
            return Err(ServiceError::NotFound(format!("No bootcamp with the id of {}", bootcamp_id)));
        }
        let params = QueryParams::parse(query, &COURSE_FIELDS)?.scoped("bootcamp", FilterValue::Id(oid));
        self.page(params, false).await
    }

    async fn get(&self, id: &str) -> Result<Document, ServiceError> {
        let course = self.load(id).await?;
        let document = bson::to_document(&course)
            .map_err(|e| ServiceError::InternalError(format!("Failed to serialize course: {}", e)))?;
        let mut documents = [document];
        self.populate_bootcamps(&mut documents).await?;
        let [document] = documents;
        Ok(document)
    }

    #[instrument(skip(self, request), fields(user = %actor.id))]
    async fn create(&self, actor: &AuthUser, bootcamp_id: &str, request: CreateCourseRequest) -> Result<Course, ServiceError> {
        let oid = parse_object_id(bootcamp_id)?;
        let bootcamp = self
            .bootcamp_repo
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No bootcamp with the id of {}", bootcamp_id)))?;
        ensure_can_modify(actor, &bootcamp.user, &format!("add a course to bootcamp {}", bootcamp_id))?;

        let course = Course {
            id: None,
            title: request.title,
            description: request.description,
            weeks: request.weeks,
            tuition: request.tuition,
            minimum_skill: request.minimum_skill,
            scholarship_available: request.scholarship_available,
            created_at: DateTime::now(),
            bootcamp: oid,
            user: actor.id,
        };

        let created = self.course_repo.insert(course).await?;
        info!("Course created");
        self.refresh_average_cost(&oid).await;
        Ok(created)
    }

    #[instrument(skip(self, request), fields(user = %actor.id))]
    async fn update(&self, actor: &AuthUser, id: &str, request: UpdateCourseRequest) -> Result<Course, ServiceError> {
        let mut course = self.load(id).await?;
        ensure_can_modify(actor, &course.user, &format!("update course {}", id))?;

        if let Some(title) = request.title {
            course.title = title;
        }
        if let Some(description) = request.description {
            course.description = description;
        }
        course.weeks = request.weeks.unwrap_or(course.weeks);
        course.tuition = request.tuition.unwrap_or(course.tuition);
        course.minimum_skill = request.minimum_skill.unwrap_or(course.minimum_skill);
        course.scholarship_available = request.scholarship_available.unwrap_or(course.scholarship_available);

        self.course_repo.update(&course).await?;
        info!("Course updated");
        self.refresh_average_cost(&course.bootcamp).await;
        Ok(course)
    }

    #[instrument(skip(self), fields(user = %actor.id))]
    async fn delete(&self, actor: &AuthUser, id: &str) -> Result<(), ServiceError> {
        let course = self.load(id).await?;
        ensure_can_modify(actor, &course.user, &format!("delete course {}", id))?;

        let oid = parse_object_id(id)?;
        self.course_repo.delete(&oid).await?;
        info!("Course deleted");
        self.refresh_average_cost(&course.bootcamp).await;
        Ok(())
    }
}
