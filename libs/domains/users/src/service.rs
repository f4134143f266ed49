use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserPayload, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic: conflict checks and password
/// hashing sit here, persistence stays behind the repository trait.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user.
    ///
    /// The email conflict check runs before the hash so the conflict path
    /// never pays for a key derivation. The repository's unique index
    /// backstops concurrent duplicates.
    pub async fn create_user(&self, input: UserPayload) -> UserResult<UserResponse> {
        if self.repository.get_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::from_payload(input, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: ObjectId) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Replace the user at `id` with the payload's fields.
    ///
    /// Existence is keyed on the target id. The email lookup only guards
    /// against taking over an address that belongs to a different record;
    /// keeping one's own email is not a conflict.
    pub async fn update_user(&self, id: ObjectId, input: UserPayload) -> UserResult<UserResponse> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        if let Some(existing) = self.repository.get_by_email(&input.email).await? {
            if existing.id != Some(id) {
                return Err(UserError::DuplicateEmail(input.email));
            }
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::from_payload(input, password_hash);

        let updated = self
            .repository
            .replace(id, user)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(updated.into())
    }

    /// Delete a user, returning the record as it was just before deletion.
    pub async fn delete_user(&self, id: ObjectId) -> UserResult<UserResponse> {
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(deleted.into())
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use mongodb::bson::doc;

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    fn payload(email: &str, password: &str) -> UserPayload {
        UserPayload {
            email: email.to_string(),
            password: password.to_string(),
            profile: doc! { "name": "Test User" },
        }
    }

    #[tokio::test]
    async fn create_stores_a_verifiable_hash_instead_of_plaintext() {
        let service = service();

        let created = service
            .create_user(payload("a@x.com", "secret"))
            .await
            .unwrap();

        assert_ne!(created.password, "secret");
        assert!(!created.id.is_empty());
        assert_eq!(created.profile.get_str("name").unwrap(), "Test User");

        let parsed = PasswordHash::new(&created.password).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"secret", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn create_rejects_existing_email() {
        let service = service();

        service
            .create_user(payload("a@x.com", "secret"))
            .await
            .unwrap();

        let result = service.create_user(payload("a@x.com", "other")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));

        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_user_reports_not_found_for_unknown_id() {
        let service = service();

        let result = service.get_user(ObjectId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_is_keyed_on_the_target_id() {
        let service = service();

        // A record with this email exists, but the target id does not
        service
            .create_user(payload("a@x.com", "secret"))
            .await
            .unwrap();

        let result = service
            .update_user(ObjectId::new(), payload("a@x.com", "secret"))
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_rehashes_password() {
        let service = service();

        let created = service
            .create_user(payload("a@x.com", "secret"))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&created.id).unwrap();

        let mut update = payload("a@x.com", "new-secret");
        update.profile = doc! { "name": "Renamed" };

        let updated = service.update_user(id, update).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.profile.get_str("name").unwrap(), "Renamed");
        assert_ne!(updated.password, "new-secret");
        assert_ne!(updated.password, created.password);
    }

    #[tokio::test]
    async fn update_rejects_email_owned_by_another_record() {
        let service = service();

        service
            .create_user(payload("first@x.com", "secret"))
            .await
            .unwrap();
        let second = service
            .create_user(payload("second@x.com", "secret"))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&second.id).unwrap();

        let result = service.update_user(id, payload("first@x.com", "secret")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn delete_returns_the_pre_deletion_record() {
        let service = service();

        let created = service
            .create_user(payload("a@x.com", "secret"))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&created.id).unwrap();

        let deleted = service.delete_user(id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.email, "a@x.com");
        assert_eq!(deleted.password, created.password);

        assert!(service.list_users().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_user(id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
