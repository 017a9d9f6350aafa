use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnhub_model::{
    Enrollments, NewUser, StreakState, UserKey, UserRecord, UserRole, Wishlist,
};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use super::{PostgresStore, map_sqlx_error, rows_touched};
use crate::database::ports::users::{LoginRecord, UsersRepository};
use crate::database::StoreResult;
use crate::error::StoreError;

const USER_COLUMNS: &str = "id, user_id, role, full_name, email, last_login, \
     current_streak, longest_streak, enrolled_courses, wishlist";

fn streak_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn decode_user(row: &PgRow) -> StoreResult<UserRecord> {
    let role: String = row.try_get("role").map_err(map_sqlx_error)?;
    let role = role
        .parse::<UserRole>()
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let enrolled: Json<Enrollments> =
        row.try_get("enrolled_courses").map_err(map_sqlx_error)?;
    let wishlist: Json<Wishlist> =
        row.try_get("wishlist").map_err(map_sqlx_error)?;

    Ok(UserRecord {
        id: UserKey(row.try_get("id").map_err(map_sqlx_error)?),
        login_id: row.try_get("user_id").map_err(map_sqlx_error)?,
        role,
        full_name: row.try_get("full_name").map_err(map_sqlx_error)?,
        email: row.try_get("email").map_err(map_sqlx_error)?,
        last_login: row.try_get("last_login").map_err(map_sqlx_error)?,
        current_streak: streak_count(
            row.try_get("current_streak").map_err(map_sqlx_error)?,
        ),
        longest_streak: streak_count(
            row.try_get("longest_streak").map_err(map_sqlx_error)?,
        ),
        enrolled_courses: enrolled.0,
        wishlist: wishlist.0,
    })
}

fn streak_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[async_trait]
impl UsersRepository for PostgresStore {
    async fn find_for_login(
        &self,
        login_id: &str,
        role: UserRole,
    ) -> StoreResult<LoginRecord> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users \
             WHERE user_id = $1 AND role = $2"
        );
        let row = sqlx::query(&sql)
            .bind(login_id)
            .bind(role.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(LoginRecord {
            user: decode_user(&row)?,
            password_hash: row
                .try_get("password_hash")
                .map_err(map_sqlx_error)?,
        })
    }

    async fn get_user(&self, id: UserKey) -> StoreResult<UserRecord> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.to_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        decode_user(&row)
    }

    async fn get_enrollments(&self, id: UserKey) -> StoreResult<Enrollments> {
        let row = sqlx::query("SELECT enrolled_courses FROM users WHERE id = $1")
            .bind(id.to_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        let Json(enrollments): Json<Enrollments> =
            row.try_get("enrolled_courses").map_err(map_sqlx_error)?;
        Ok(enrollments)
    }

    async fn replace_enrollments(
        &self,
        id: UserKey,
        enrollments: &Enrollments,
    ) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE users SET enrolled_courses = $2 WHERE id = $1")
                .bind(id.to_uuid())
                .bind(Json(enrollments))
                .execute(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        rows_touched(result.rows_affected())
    }

    async fn get_wishlist(&self, id: UserKey) -> StoreResult<Wishlist> {
        let row = sqlx::query("SELECT wishlist FROM users WHERE id = $1")
            .bind(id.to_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        let Json(wishlist): Json<Wishlist> =
            row.try_get("wishlist").map_err(map_sqlx_error)?;
        Ok(wishlist)
    }

    async fn replace_wishlist(
        &self,
        id: UserKey,
        wishlist: &Wishlist,
    ) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET wishlist = $2 WHERE id = $1")
            .bind(id.to_uuid())
            .bind(Json(wishlist))
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        rows_touched(result.rows_affected())
    }

    async fn get_streak(&self, id: UserKey) -> StoreResult<StreakState> {
        let row = sqlx::query(
            r#"
            SELECT last_login, current_streak, longest_streak
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let last_login: Option<DateTime<Utc>> =
            row.try_get("last_login").map_err(map_sqlx_error)?;
        let current: i32 =
            row.try_get("current_streak").map_err(map_sqlx_error)?;
        let longest: i32 =
            row.try_get("longest_streak").map_err(map_sqlx_error)?;

        Ok(StreakState {
            last_login,
            current: streak_count(current),
            longest: streak_count(longest),
        })
    }

    async fn record_login(
        &self,
        id: UserKey,
        streak: &StreakState,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login = $2, current_streak = $3, longest_streak = $4
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .bind(streak.last_login)
        .bind(streak_column(streak.current))
        .bind(streak_column(streak.longest))
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        rows_touched(result.rows_affected())
    }

    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> StoreResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users (id, user_id, role, password_hash, full_name, email) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );
        let id: Uuid = UserKey::new().to_uuid();
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&user.login_id)
            .bind(user.role.as_str())
            .bind(password_hash)
            .bind(user.full_name.as_deref())
            .bind(user.email.as_deref())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        decode_user(&row)
    }

    async fn set_password_hash(
        &self,
        id: UserKey,
        password_hash: &str,
    ) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
                .bind(id.to_uuid())
                .bind(password_hash)
                .execute(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        rows_touched(result.rows_affected())
    }
}
