use std::sync::Arc;

use domain::{CreatedAt, Email, Entity, Id, PasswordHash};
use models::{user, ConversionRegistry, ModelError};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::warn;

use crate::users::entity::User;
use crate::users::errors::UserError;
use crate::users::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
    pub conversions: Arc<ConversionRegistry>,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection, conversions: Arc<ConversionRegistry>) -> Self {
        Self { db, conversions }
    }

    fn to_active_model(&self, u: &User) -> Result<user::ActiveModel, UserError> {
        Ok(user::ActiveModel {
            id: Set(self.conversions.to_column(u.id())?),
            email: Set(self.conversions.to_column(u.email())?),
            password_hash: Set(u.password_hash().hash().to_string()),
            password_salt: Set(u.password_hash().salt().to_string()),
            created_at: Set(self.conversions.to_column(&u.created_at())?),
        })
    }

    fn from_model(&self, m: user::Model) -> Result<User, UserError> {
        let id: Id = self.conversions.from_column(m.id)?;
        let email: Email = self.conversions.from_column(m.email)?;
        let created_at: CreatedAt = self.conversions.from_column(m.created_at)?;
        let hash = PasswordHash::from_parts(m.password_hash, m.password_salt)
            .map_err(|e| UserError::Repository(format!("stored user is invalid: {e}")))?;
        Ok(User::restore(id, created_at, email, hash))
    }
}

fn map_insert_error(e: DbErr) -> UserError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(event = "duplicate_email", detail = %detail, "unique constraint hit on insert");
            UserError::DuplicatedEmail
        }
        _ => ModelError::Db(e).into(),
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(self.conversions.to_column(email)?))
            .one(&self.db)
            .await
            .map_err(ModelError::from)?;
        res.map(|m| self.from_model(m)).transpose()
    }

    async fn find_by_id(&self, id: &Id) -> Result<Option<User>, UserError> {
        let res = user::Entity::find_by_id(self.conversions.to_column(id)?)
            .one(&self.db)
            .await
            .map_err(ModelError::from)?;
        res.map(|m| self.from_model(m)).transpose()
    }

    async fn insert(&self, u: &User) -> Result<(), UserError> {
        self.to_active_model(u)?.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(())
    }
}
