use crate::db::error::DbError;
use crate::db::repo::UserRepo;
use crate::db::DbResult;
use crate::models::types::UserId;
use crate::models::user::{NewUser, User};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

/// In-process stand-in for the `users` table. Usernames are unique and
/// compared exactly, like the column under the default collation.
pub struct MemUserRepository {
    users: DashMap<UserId, User>,
    by_username: DashMap<String, UserId>,
    next_id: AtomicI64,
}

impl MemUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_username: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserRepo for MemUserRepository {
    async fn get_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let Some(id) = self.by_username.get(username).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.get_by_id(id).await
    }

    async fn insert(&self, new_user: &NewUser) -> DbResult<User> {
        // The vacant entry keeps the username reserved until the row is in place.
        let entry = self.by_username.entry(new_user.username.clone());
        let Entry::Vacant(slot) = entry else {
            return Err(DbError::UniqueViolation("users_username_key".into()));
        };

        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let user = User {
            id,
            first_name: new_user.first_name.clone(),
            middle_name: new_user.middle_name.clone(),
            last_name: new_user.last_name.clone(),
            username: new_user.username.clone(),
            pwd_hash: new_user.pwd_hash.clone(),
            is_admin: new_user.is_admin,
        };

        self.users.insert(id, user.clone());
        slot.insert(id);

        Ok(user)
    }
}
