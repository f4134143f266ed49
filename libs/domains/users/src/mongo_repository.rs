use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// Collection backing the users domain
pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of [`UserRepository`].
///
/// Email uniqueness is enforced by a unique index (see
/// [`MongoUserRepository::ensure_indexes`]), so a duplicate that slips past
/// the service's pre-check under concurrency still surfaces as
/// [`UserError::DuplicateEmail`] rather than persisting twice.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }

    /// Create the unique email index. Call once at startup, before the
    /// router starts taking traffic.
    pub async fn ensure_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;
        Ok(())
    }

    fn classify(err: mongodb::error::Error, email: &str) -> UserError {
        if is_duplicate_key_error(&err) {
            UserError::DuplicateEmail(email.to_string())
        } else {
            UserError::Database(err)
        }
    }
}

/// Server error code 11000 = unique index violation
fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: User) -> UserResult<User> {
        let mut user = user;

        let result = self
            .collection
            .insert_one(&user)
            .await
            .map_err(|e| Self::classify(e, &user.email))?;

        user.id = result.inserted_id.as_object_id();

        tracing::info!(user_id = ?user.id, email = %user.email, "Created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, user))]
    async fn replace(&self, id: ObjectId, user: User) -> UserResult<Option<User>> {
        let updated = self
            .collection
            .find_one_and_replace(doc! { "_id": id }, &user)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| Self::classify(e, &user.email))?;

        if updated.is_some() {
            tracing::info!(user_id = %id, "Updated user");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;

        if deleted.is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }
}
