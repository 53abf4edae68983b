use async_trait::async_trait;
use domain::{Email, Id};

use super::entity::User;
use super::errors::UserError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserError>;
    async fn find_by_id(&self, id: &Id) -> Result<Option<User>, UserError>;
    /// Fails with `DuplicatedEmail` when the email is already stored.
    async fn insert(&self, user: &User) -> Result<(), UserError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    use domain::Entity;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<HashMap<Id, User>>, // key: user id
    }

    impl InMemoryUserRepository {
        fn lock(&self) -> Result<MutexGuard<'_, HashMap<Id, User>>, UserError> {
            self.users.lock().map_err(|e| UserError::Repository(e.to_string()))
        }

        pub fn len(&self) -> usize {
            self.users.lock().map(|u| u.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserError> {
            let users = self.lock()?;
            Ok(users.values().find(|u| u.email() == email).cloned())
        }

        async fn find_by_id(&self, id: &Id) -> Result<Option<User>, UserError> {
            let users = self.lock()?;
            Ok(users.get(id).cloned())
        }

        async fn insert(&self, user: &User) -> Result<(), UserError> {
            let mut users = self.lock()?;
            if users.values().any(|u| u.email() == user.email()) {
                return Err(UserError::DuplicatedEmail);
            }
            users.insert(user.id().clone(), user.clone());
            Ok(())
        }
    }
}
