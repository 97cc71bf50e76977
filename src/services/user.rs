use crate::db::error::DbError;
use crate::db::repo::UserRepo;
use crate::error::{AppResult, DomainError, LoginError};
use crate::models::types::UserId;
use crate::models::user::{NewUser, User};
use std::sync::Arc;

pub struct UserService {
    repo: Arc<dyn UserRepo>,
}

pub type LoginResult<T> = Result<T, LoginError>;

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    pub async fn get_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.repo.get_by_username(username).await?)
    }

    pub async fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.repo.get_by_username(username).await?.is_some())
    }

    pub async fn register(&self, new_user: &NewUser) -> AppResult<User> {
        User::validate_username(&new_user.username)?;

        if self.exists(&new_user.username).await? {
            return Err(DomainError::AlreadyExists(new_user.username.clone()));
        }

        // The check above is racy; the unique index has the final word.
        match self.repo.insert(new_user).await {
            Ok(user) => Ok(user),
            Err(DbError::UniqueViolation(_)) => Err(DomainError::AlreadyExists(new_user.username.clone())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> LoginResult<User> {
        if User::validate_username(username).is_err() {
            return Err(LoginError::UserNotFound);
        }

        let Some(user) = self
            .repo
            .get_by_username(username)
            .await
            .map_err(|e| LoginError::InternalError(e.to_string()))?
        else {
            return Err(LoginError::UserNotFound);
        };

        if !user.check_password(password) {
            tracing::info!(username, "login rejected: wrong password");
            return Err(LoginError::InvalidPassword);
        }

        tracing::info!(id = %user.id, username, "login accepted");
        Ok(user)
    }
}
