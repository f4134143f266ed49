use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning its identifier.
    ///
    /// Fails with [`UserError::DuplicateEmail`] when another record
    /// already owns the email.
    async fn create(&self, user: User) -> UserResult<User>;

    /// Fetch a user by identifier
    async fn get_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    /// Fetch a user by exact email match
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// All users, in whatever order the store yields them
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Replace the record at `id` wholesale, returning the post-update
    /// state, or `None` when no record has that id.
    async fn replace(&self, id: ObjectId, user: User) -> UserResult<Option<User>>;

    /// Remove the record at `id`, returning it as it was just before
    /// deletion, or `None` when no record has that id.
    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<ObjectId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            ..user
        };
        users.insert(id, user.clone());

        tracing::info!(user_id = %id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn replace(&self, id: ObjectId, user: User) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if !users.contains_key(&id) {
            return Ok(None);
        }

        // Same invariant the unique index enforces in the real store
        if users
            .values()
            .any(|u| u.id != Some(id) && u.email == user.email)
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let user = User {
            id: Some(id),
            ..user
        };
        users.insert(id, user.clone());

        tracing::info!(user_id = %id, "Updated user");
        Ok(Some(user))
    }

    async fn delete(&self, id: ObjectId) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        let removed = users.remove(&id);
        if removed.is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn sample_user(email: &str) -> User {
        User {
            id: None,
            email: email.to_string(),
            password: "hashed_password".to_string(),
            profile: doc! { "name": "Test User" },
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_get_by_id_round_trips() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(sample_user("test@example.com")).await.unwrap();
        let id = created.id.expect("created user should have an id");

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "test@example.com");
        assert_eq!(fetched.profile.get_str("name").unwrap(), "Test User");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(sample_user("test@example.com")).await.unwrap();

        let result = repo.create(sample_user("test@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));

        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_returns_none_for_unknown_id() {
        let repo = InMemoryUserRepository::new();

        let result = repo
            .replace(ObjectId::new(), sample_user("test@example.com"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn replace_keeps_id_and_returns_post_update_state() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(sample_user("test@example.com")).await.unwrap();
        let id = created.id.unwrap();

        let mut replacement = sample_user("renamed@example.com");
        replacement.profile = doc! { "name": "Renamed" };

        let updated = repo.replace(id, replacement).await.unwrap().unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.email, "renamed@example.com");
        assert_eq!(updated.profile.get_str("name").unwrap(), "Renamed");
    }

    #[tokio::test]
    async fn replace_rejects_email_owned_by_another_record() {
        let repo = InMemoryUserRepository::new();

        repo.create(sample_user("first@example.com")).await.unwrap();
        let second = repo.create(sample_user("second@example.com")).await.unwrap();

        let result = repo
            .replace(second.id.unwrap(), sample_user("first@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_record() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(sample_user("test@example.com")).await.unwrap();
        let id = created.id.unwrap();

        let deleted = repo.delete(id).await.unwrap().unwrap();
        assert_eq!(deleted.email, "test@example.com");

        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(repo.delete(id).await.unwrap().is_none());
    }
}
