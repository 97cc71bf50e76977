use crate::db::error::DbError;
use crate::db::repo::UserRepo;
use crate::db::{Db, DbResult, map_row, map_row_opt};
use crate::models::types::UserId;
use crate::models::user::{NewUser, User};
use std::sync::Arc;

pub struct UserRepository {
    db: Arc<Db>,
}

impl UserRepository {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait::async_trait]
impl UserRepo for UserRepository {
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            SELECT id, first_name, middle_name, last_name, username, pwd_hash, is_admin
            FROM users
            WHERE id = $1
            "#,
            )
            .await?;

        let row_opt = client.query_opt(&stmt, &[&id]).await?;
        tracing::debug!(%id, found = row_opt.is_some(), "user lookup by id");

        map_row_opt(row_opt, User::try_from_row, &format!("UserRepo::get_by_id id={}", id))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            SELECT id, first_name, middle_name, last_name, username, pwd_hash, is_admin
            FROM users
            WHERE username = $1
            "#,
            )
            .await?;

        let row_opt = client.query_opt(&stmt, &[&username]).await?;
        tracing::debug!(username, found = row_opt.is_some(), "user lookup by username");

        map_row_opt(
            row_opt,
            User::try_from_row,
            &format!("UserRepo::get_by_username username={}", username),
        )
    }

    async fn insert(&self, new_user: &NewUser) -> DbResult<User> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            INSERT INTO users (first_name, middle_name, last_name, username, pwd_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, middle_name, last_name, username, pwd_hash, is_admin
            "#,
            )
            .await?;

        let row = client
            .query_one(
                &stmt,
                &[
                    &new_user.first_name,
                    &new_user.middle_name,
                    &new_user.last_name,
                    &new_user.username,
                    &new_user.pwd_hash,
                    &new_user.is_admin,
                ],
            )
            .await
            .map_err(DbError::from_pg)?;

        let user = map_row(&row, User::try_from_row, "UserRepo::insert")?;
        tracing::info!(id = %user.id, username = %user.username, "user inserted");

        Ok(user)
    }
}
