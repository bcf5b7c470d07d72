//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::domain::{DomainError, NewUser, User, UserCredentials, UserRepository};
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }

    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let identifier = identifier.trim();
        let user = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(identifier.to_lowercase()))
                    .add(user::Column::Username.eq(identifier)),
            )
            .one(&self.db)
            .await?;

        Ok(user.map(|model| UserCredentials {
            password_hash: model.password_hash.clone(),
            user: User::from(model),
        }))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_user = ActiveModel {
            email: Set(input.email),
            username: Set(input.username),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            phone: Set(input.phone),
            role: Set(input.role),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_user.insert(&self.db).await?;
        Ok(User::from(result))
    }

    async fn update_profile(
        &self,
        id: i32,
        full_name: Option<String>,
        phone: Option<Option<String>>,
    ) -> Result<User, DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(full_name) = full_name {
            active.full_name = Set(full_name);
        }
        if let Some(phone) = phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(User::from(result))
    }
}
