//! Adapter for a hosted PostgREST-compatible backend.

pub mod query;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnhub_model::{
    Course, CourseId, Enrollments, NewCourse, NewUser, StreakState, UserKey,
    UserRecord, UserRole, Wishlist,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::database::ports::courses::{CourseSearchRows, CoursesRepository};
use crate::database::ports::users::{LoginRecord, UsersRepository};
use crate::database::StoreResult;
use crate::error::StoreError;

pub use query::{RestQuery, content_range_total};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const USER_COLUMNS: &str = "id,user_id,role,full_name,email,last_login,\
     current_streak,longest_streak,enrolled_courses,wishlist";

#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Root of the REST API, e.g. `https://project.example.co/rest/v1/`.
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRow {
    #[serde(flatten)]
    user: UserRecord,
    password_hash: String,
}

#[derive(Debug, Deserialize)]
struct StreakRow {
    last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    longest_streak: u32,
}

#[derive(Debug, Deserialize)]
struct EnrollmentsRow {
    #[serde(default)]
    enrolled_courses: Enrollments,
}

#[derive(Debug, Deserialize)]
struct WishlistRow {
    #[serde(default)]
    wishlist: Wishlist,
}

#[derive(Debug, Serialize)]
struct InsertUser<'a> {
    id: UserKey,
    user_id: &'a str,
    role: UserRole,
    password_hash: &'a str,
    full_name: Option<&'a str>,
    email: Option<&'a str>,
}

/// Exact total from `Content-Range`. Without a usable header only the
/// current page is known, so paging math will undercount.
fn search_total(content_range: Option<&str>, page_rows: usize) -> u64 {
    match content_range.and_then(content_range_total) {
        Some(total) => total,
        None => {
            tracing::warn!(
                content_range,
                page_rows,
                "search response carried no exact count; total falls back to page size"
            );
            page_rows as u64
        }
    }
}

fn map_transport(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Decode(err.to_string())
    } else {
        StoreError::Network(err.to_string())
    }
}

impl RestStore {
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(map_transport)?;

        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    fn table_url(&self, table: &str, query: &RestQuery) -> StoreResult<Url> {
        let mut url = self
            .base_url
            .join(table)
            .map_err(|e| StoreError::Network(format!("invalid table url: {e}")))?;
        url.query_pairs_mut().extend_pairs(query.pairs());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        let response = builder.send().await.map_err(map_transport)?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<PostgrestError>(&body) {
            Ok(PostgrestError {
                code: Some(code),
                message,
            }) if code == StoreError::NO_ROWS_CODE => {
                tracing::debug!(?message, "single-row request matched nothing");
                StoreError::NoRows
            }
            Ok(PostgrestError { code, message }) => StoreError::backend(
                code.unwrap_or_else(|| status.as_str().to_string()),
                message.unwrap_or(body),
            ),
            Err(_) if status == StatusCode::NOT_ACCEPTABLE => StoreError::NoRows,
            Err(_) => StoreError::backend(status.as_str(), body),
        })
    }

    async fn fetch_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: RestQuery,
    ) -> StoreResult<T> {
        let url = self.table_url(table, &query)?;
        let response = self
            .send(
                self.request(Method::GET, url)
                    .header(header::ACCEPT, SINGLE_OBJECT),
            )
            .await?;
        response.json::<T>().await.map_err(map_transport)
    }

    async fn fetch_many<T: DeserializeOwned>(
        &self,
        table: &str,
        query: RestQuery,
    ) -> StoreResult<Vec<T>> {
        let url = self.table_url(table, &query)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        response.json::<Vec<T>>().await.map_err(map_transport)
    }

    /// Whole-column update of the user row `id`.
    async fn patch_user(
        &self,
        id: UserKey,
        body: serde_json::Value,
    ) -> StoreResult<()> {
        let url = self.table_url("users", &RestQuery::new().eq("id", id))?;
        let response = self
            .send(
                self.request(Method::PATCH, url)
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
        let touched: Vec<serde_json::Value> =
            response.json().await.map_err(map_transport)?;
        if touched.is_empty() {
            return Err(StoreError::NoRows);
        }
        Ok(())
    }

    async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        body: &B,
    ) -> StoreResult<T> {
        let url = self.table_url(table, &RestQuery::new().select(select))?;
        let response = self
            .send(
                self.request(Method::POST, url)
                    .header("Prefer", "return=representation")
                    .header(header::ACCEPT, SINGLE_OBJECT)
                    .json(body),
            )
            .await?;
        response.json::<T>().await.map_err(map_transport)
    }
}

#[async_trait]
impl UsersRepository for RestStore {
    async fn find_for_login(
        &self,
        login_id: &str,
        role: UserRole,
    ) -> StoreResult<LoginRecord> {
        let query = RestQuery::new()
            .select(&format!("{USER_COLUMNS},password_hash"))
            .eq("user_id", login_id)
            .eq("role", role.as_str());
        let row: LoginRow = self.fetch_single("users", query).await?;
        Ok(LoginRecord {
            user: row.user,
            password_hash: row.password_hash,
        })
    }

    async fn get_user(&self, id: UserKey) -> StoreResult<UserRecord> {
        let query = RestQuery::new().select(USER_COLUMNS).eq("id", id);
        self.fetch_single("users", query).await
    }

    async fn get_enrollments(&self, id: UserKey) -> StoreResult<Enrollments> {
        let query = RestQuery::new().select("enrolled_courses").eq("id", id);
        let row: EnrollmentsRow = self.fetch_single("users", query).await?;
        Ok(row.enrolled_courses)
    }

    async fn replace_enrollments(
        &self,
        id: UserKey,
        enrollments: &Enrollments,
    ) -> StoreResult<()> {
        self.patch_user(id, json!({ "enrolled_courses": enrollments }))
            .await
    }

    async fn get_wishlist(&self, id: UserKey) -> StoreResult<Wishlist> {
        let query = RestQuery::new().select("wishlist").eq("id", id);
        let row: WishlistRow = self.fetch_single("users", query).await?;
        Ok(row.wishlist)
    }

    async fn replace_wishlist(
        &self,
        id: UserKey,
        wishlist: &Wishlist,
    ) -> StoreResult<()> {
        self.patch_user(id, json!({ "wishlist": wishlist })).await
    }

    async fn get_streak(&self, id: UserKey) -> StoreResult<StreakState> {
        let query = RestQuery::new()
            .select("last_login,current_streak,longest_streak")
            .eq("id", id);
        let row: StreakRow = self.fetch_single("users", query).await?;
        Ok(StreakState {
            last_login: row.last_login,
            current: row.current_streak,
            longest: row.longest_streak,
        })
    }

    async fn record_login(
        &self,
        id: UserKey,
        streak: &StreakState,
    ) -> StoreResult<()> {
        self.patch_user(
            id,
            json!({
                "last_login": streak.last_login,
                "current_streak": streak.current,
                "longest_streak": streak.longest,
            }),
        )
        .await
    }

    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> StoreResult<UserRecord> {
        let body = InsertUser {
            id: UserKey::new(),
            user_id: &user.login_id,
            role: user.role,
            password_hash,
            full_name: user.full_name.as_deref(),
            email: user.email.as_deref(),
        };
        self.insert("users", USER_COLUMNS, &body).await
    }

    async fn set_password_hash(
        &self,
        id: UserKey,
        password_hash: &str,
    ) -> StoreResult<()> {
        self.patch_user(id, json!({ "password_hash": password_hash }))
            .await
    }
}

#[async_trait]
impl CoursesRepository for RestStore {
    async fn courses_by_ids(&self, ids: &[CourseId]) -> StoreResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_many("courses", RestQuery::courses_by_ids(ids)).await
    }

    async fn search(
        &self,
        query: &crate::query::CourseQuery,
    ) -> StoreResult<CourseSearchRows> {
        let url = self.table_url("courses", &RestQuery::course_search(query))?;
        let response = self
            .send(
                self.request(Method::GET, url)
                    .header("Prefer", "count=exact"),
            )
            .await?;

        let content_range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let rows: Vec<Course> = response.json().await.map_err(map_transport)?;

        Ok(CourseSearchRows {
            total: search_total(content_range.as_deref(), rows.len()),
            rows,
        })
    }

    async fn create_course(&self, course: &NewCourse) -> StoreResult<Course> {
        let body = json!({
            "id": CourseId::new(),
            "title": course.title,
            "description": course.description,
            "category": course.category,
            "is_visible": course.is_visible,
        });
        self.insert("courses", "*", &body).await
    }
}
