//!
//! # Store Seam
//!
//! Handlers never talk to the database engine directly: they receive
//! `web::Data<dyn TaskStore>` / `web::Data<dyn UserStore>` and issue exactly
//! one call per request. `PgStore` implements both traits over a `PgPool`;
//! `MemStore` implements the same observable semantics in-process and backs
//! the integration suite, so `cargo test` needs no external services.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskQuery, TaskStatus, TaskUpdate, User};

pub use memory::MemStore;
pub use postgres::PgStore;

/// Sort direction for the list operation, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Normalized parameters for a task list query.
///
/// Filters combine with logical AND; absent filters impose no constraint.
/// `skip`/`limit` are the already-computed pagination window.
#[derive(Debug, Default)]
pub struct TaskListParams {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
    pub skip: i64,
    pub limit: i64,
}

impl From<TaskQuery> for TaskListParams {
    fn from(query: TaskQuery) -> Self {
        let page = query.page();
        let limit = query.limit();
        // "asc" sorts ascending, any other non-empty value descending,
        // absent or empty means store default order.
        let sort = match query.sort_by.as_deref() {
            Some("asc") => Some(SortOrder::Asc),
            Some(s) if !s.is_empty() => Some(SortOrder::Desc),
            _ => None,
        };
        Self {
            status: query.status,
            search: query.search,
            sort,
            // Saturating arithmetic: the permissive contract accepts any
            // numeric page/limit, including values whose product would
            // overflow i64. A huge window is just an empty page.
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

/// Persistence operations over the Task resource.
///
/// Each method is one atomic store operation; nothing here retries or spans
/// multiple documents.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task. The store assigns `id` and `created_at`;
    /// `created_by` comes from the authenticated caller.
    async fn insert_task(&self, input: TaskInput, created_by: i32) -> Result<Task, AppError>;

    /// List tasks matching the given filters, sorted and windowed.
    async fn list_tasks(&self, params: TaskListParams) -> Result<Vec<Task>, AppError>;

    /// Fetch a task by id; `None` when no such task exists.
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Apply the provided fields onto the stored task and return the
    /// post-update document; `None` when no such task exists.
    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Option<Task>, AppError>;

    /// Remove a task permanently. Returns `false` when no such task exists.
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Persistence operations over user accounts, as needed by the auth routes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; the store assigns `id` and `created_at`.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Look a user up by email; `None` when no account matches.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}
