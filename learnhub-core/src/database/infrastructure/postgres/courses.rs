use async_trait::async_trait;
use learnhub_model::{Course, CourseId, NewCourse};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{PostgresStore, map_sqlx_error};
use crate::database::ports::courses::{CourseSearchRows, CoursesRepository};
use crate::database::StoreResult;
use crate::query::CourseQuery;

const COURSE_COLUMNS: &str =
    "id, title, description, category, is_visible, created_at";

fn decode_course(row: &PgRow) -> StoreResult<Course> {
    Ok(Course {
        id: CourseId(row.try_get("id").map_err(map_sqlx_error)?),
        title: row.try_get("title").map_err(map_sqlx_error)?,
        description: row.try_get("description").map_err(map_sqlx_error)?,
        category: row.try_get("category").map_err(map_sqlx_error)?,
        is_visible: row.try_get("is_visible").map_err(map_sqlx_error)?,
        created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
    })
}

/// Escapes the `ILIKE` escape character itself; `%` and `_` never reach
/// this point.
fn contains_pattern(text: &str) -> String {
    format!("%{}%", text.replace('\\', "\\\\"))
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &CourseQuery) {
    builder.push(" WHERE is_visible = TRUE");
    if let Some(text) = &query.text {
        let pattern = contains_pattern(text);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category) = &query.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
}

fn as_sql_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl CoursesRepository for PostgresStore {
    async fn courses_by_ids(&self, ids: &[CourseId]) -> StoreResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(CourseId::to_uuid).collect();
        let sql =
            format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ANY($1)");
        let rows = sqlx::query(&sql)
            .bind(uuids)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(decode_course).collect()
    }

    async fn search(&self, query: &CourseQuery) -> StoreResult<CourseSearchRows> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
        push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COURSE_COLUMNS} FROM courses"
        ));
        push_filters(&mut select, query);
        select
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(as_sql_bigint(query.pagination.offset()))
            .push(" LIMIT ")
            .push_bind(as_sql_bigint(query.pagination.limit()));

        let rows = select
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        tracing::debug!(
            text = ?query.text,
            category = ?query.category,
            total,
            "course search executed"
        );

        Ok(CourseSearchRows {
            rows: rows.iter().map(decode_course).collect::<StoreResult<_>>()?,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn create_course(&self, course: &NewCourse) -> StoreResult<Course> {
        let sql = format!(
            "INSERT INTO courses (id, title, description, category, is_visible) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COURSE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(CourseId::new().to_uuid())
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.category)
            .bind(course.is_visible)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        decode_course(&row)
    }
}
