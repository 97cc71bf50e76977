use crate::db::DbResult;
use crate::models::types::UserId;
use crate::models::user::{NewUser, User};

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Fetches a user by primary key. `None` when no row matches.
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<User>>;
    /// Fetches a user by exact (case-sensitive) username. `None` when no row matches.
    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>>;
    /// Hashes the password and stores a new user, returning the stored row
    async fn insert(&self, new_user: &NewUser) -> DbResult<User>;
}
