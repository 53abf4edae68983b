use std::sync::Arc;

use domain::{Email, Entity, Id, Password, PasswordHash};
use tracing::{debug, info, instrument};

use super::entity::User;
use super::errors::UserError;
use super::repository::UserRepository;

/// User business service independent of web framework
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Register a new user with a PBKDF2-hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::users::{repository::mock::InMemoryUserRepository, UserService};
    /// use domain::{Email, Password};
    /// use std::sync::Arc;
    ///
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::default()));
    /// let input = (Email::new("USER@example.com").unwrap(), Password::new("Secret123").unwrap());
    /// let user = tokio_test::block_on(svc.register(input.0, input.1)).unwrap();
    /// assert_eq!(user.email().value(), "user@example.com");
    /// ```
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn register(&self, email: Email, password: Password) -> Result<User, UserError> {
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!(user_id = %existing.id(), "email already registered");
            return Err(UserError::DuplicatedEmail);
        }

        let hash = tokio::task::spawn_blocking(move || PasswordHash::derive(&password))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let user = User::new(email, hash);
        self.repo.insert(&user).await?;
        info!(user_id = %user.id(), email = %user.email(), "user_registered");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: &Id) -> Result<User, UserError> {
        self.repo.find_by_id(id).await?.ok_or(UserError::NotFound)
    }
}
