use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, DateTime, Document};
use mongodb::Collection;
use tracing::{debug, instrument};

use crate::model::user::User;
use crate::repository::mongo_client::{MongoDatabase, USERS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Matches a stored reset-token hash whose expiry is still ahead of `now`
pub(crate) fn reset_token_filter(hashed_token: &str, now: DateTime) -> Document {
    doc! {
        "resetPasswordToken": hashed_token,
        "resetPasswordExpire": { "$gt": now },
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    /// Replaces the stored document with `user` (matched by id)
    async fn update(&self, user: &User) -> RepositoryResult<()>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    /// User holding the given hashed reset token, if it expires after `now`
    async fn find_by_reset_token(&self, hashed_token: &str, now: DateTime) -> RepositoryResult<Option<User>>;
}

pub struct UserRepositoryImpl {
    collection: Collection<User>,
}

impl UserRepositoryImpl {
    pub fn new(db: &MongoDatabase) -> Self {
        UserRepositoryImpl { collection: db.collection::<User>(USERS) }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let id = ObjectId::new();
        user.id = Some(id);
        self.collection.insert_one(&user, None).await?;
        debug!("Inserted user {}", id);
        Ok(user)
    }

    #[instrument(skip(self, user))]
    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let id = user.id.ok_or_else(|| RepositoryError::validation("Cannot update a user without id"))?;
        let result = self.collection.replace_one(doc! { "_id": id }, user, None).await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!("No user found for ID: {}", id)));
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email.to_lowercase() };
        Ok(self.collection.find_one(filter, None).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_reset_token(&self, hashed_token: &str, now: DateTime) -> RepositoryResult<Option<User>> {
        Ok(self.collection.find_one(reset_token_filter(hashed_token, now), None).await?)
    }
}
