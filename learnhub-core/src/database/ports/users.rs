use async_trait::async_trait;
use learnhub_model::{
    Enrollments, NewUser, StreakState, UserKey, UserRecord, UserRole, Wishlist,
};

use crate::database::StoreResult;

/// A user row together with its stored password hash.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub user: UserRecord,
    pub password_hash: String,
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Single-row lookup by login id scoped to `role`.
    async fn find_for_login(
        &self,
        login_id: &str,
        role: UserRole,
    ) -> StoreResult<LoginRecord>;
    async fn get_user(&self, id: UserKey) -> StoreResult<UserRecord>;

    async fn get_enrollments(&self, id: UserKey) -> StoreResult<Enrollments>;
    async fn replace_enrollments(
        &self,
        id: UserKey,
        enrollments: &Enrollments,
    ) -> StoreResult<()>;

    async fn get_wishlist(&self, id: UserKey) -> StoreResult<Wishlist>;
    async fn replace_wishlist(
        &self,
        id: UserKey,
        wishlist: &Wishlist,
    ) -> StoreResult<()>;

    async fn get_streak(&self, id: UserKey) -> StoreResult<StreakState>;
    /// Persists the streak triple; `streak.last_login` is the login instant.
    async fn record_login(
        &self,
        id: UserKey,
        streak: &StreakState,
    ) -> StoreResult<()>;

    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> StoreResult<UserRecord>;
    async fn set_password_hash(
        &self,
        id: UserKey,
        password_hash: &str,
    ) -> StoreResult<()>;
}
