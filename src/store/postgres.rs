use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskUpdate, User};
use crate::store::{SortOrder, TaskListParams, TaskStore, UserStore};

const TASK_COLUMNS: &str = "id, title, description, status, created_by, created_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

/// Production store over a shared `PgPool`. The pool is opened once at
/// startup and cloned into every request; per-document atomicity comes from
/// single-statement `UPDATE ... RETURNING` / `DELETE`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, input: TaskInput, created_by: i32) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, created_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks(&self, params: TaskListParams) -> Result<Vec<Task>, AppError> {
        // Conditions are appended dynamically and combine with AND.
        let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);
        let mut param_count = 1;
        let mut conditions: Vec<String> = Vec::new();

        if params.status.is_some() {
            conditions.push(format!("status = ${}", param_count));
            param_count += 1;
        }
        if params.search.is_some() {
            conditions.push(format!("title ILIKE ${}", param_count));
            param_count += 1;
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        match params.sort {
            Some(SortOrder::Asc) => sql.push_str(" ORDER BY created_at ASC"),
            Some(SortOrder::Desc) => sql.push_str(" ORDER BY created_at DESC"),
            // No explicit sort: whatever order the store yields.
            None => {}
        }

        sql.push_str(&format!(" OFFSET ${} LIMIT ${}", param_count, param_count + 1));

        let mut query_builder = sqlx::query_as::<_, Task>(&sql);

        if let Some(status) = params.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(search) = &params.search {
            query_builder = query_builder.bind(format!("%{}%", escape_like(search)));
        }
        query_builder = query_builder.bind(params.skip).bind(params.limit);

        let tasks = query_builder.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Option<Task>, AppError> {
        if update.is_empty() {
            // Nothing to apply: an empty update returns the current document.
            return self.get_task(id).await;
        }

        let mut assignments: Vec<String> = Vec::new();
        let mut param_count = 1;

        if update.title.is_some() {
            assignments.push(format!("title = ${}", param_count));
            param_count += 1;
        }
        if update.description.is_some() {
            assignments.push(format!("description = ${}", param_count));
            param_count += 1;
        }
        if update.status.is_some() {
            assignments.push(format!("status = ${}", param_count));
            param_count += 1;
        }

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = ${} RETURNING {}",
            assignments.join(", "),
            param_count,
            TASK_COLUMNS
        );

        let mut query_builder = sqlx::query_as::<_, Task>(&sql);
        if let Some(title) = &update.title {
            query_builder = query_builder.bind(title);
        }
        if let Some(description) = &update.description {
            query_builder = query_builder.bind(description);
        }
        if let Some(status) = update.status {
            query_builder = query_builder.bind(status);
        }
        query_builder = query_builder.bind(id);

        let task = query_builder.fetch_optional(&self.pool).await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
