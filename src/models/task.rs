use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Open,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

/// Input structure for creating a task.
///
/// `createdBy` is never part of this shape: unknown body fields are dropped at
/// deserialization, so the owning user id always comes from the authenticated
/// caller and cannot be spoofed.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Optional status. A task created without one simply has no status;
    /// no server-side default is applied.
    pub status: Option<TaskStatus>,
}

/// Input structure for updating a task.
///
/// Only the fields present here are mutable: `id`, `createdBy`, and
/// `createdAt` are structurally immutable after creation. Absent fields are
/// left untouched on the stored document.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct TaskUpdate {
    /// New title, 1 to 200 characters when provided.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    /// New description, at most 1000 characters when provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// New status when provided.
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// True when no field is set; the store then returns the document as-is.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Represents a task entity as stored and as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the store.
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// Optional description; omitted from JSON when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional status; omitted from JSON when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Id of the user who created the task. Set exactly once, at creation.
    pub created_by: i32,
    /// Timestamp of creation, assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Default page number when `page` is absent or non-numeric.
pub const DEFAULT_PAGE: i64 = 1;
/// Default page size when `limit` is absent or non-numeric.
pub const DEFAULT_LIMIT: i64 = 10;

/// Query parameters accepted by the task list endpoint.
///
/// `page` and `limit` deserialize as raw strings on purpose: the contract is
/// permissive and falls back to defaults on absent or non-numeric values
/// rather than rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct TaskQuery {
    /// Exact-match status filter. Tasks with no status never match.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring filter against the title.
    pub search: Option<String>,
    /// `"asc"` sorts by creation time ascending, any other non-empty value
    /// descending; absent or empty leaves the store's default order.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// 1-based page number, default 1.
    pub page: Option<String>,
    /// Page size, default 10.
    pub limit: Option<String>,
}

impl TaskQuery {
    pub fn page(&self) -> i64 {
        parse_positive(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        parse_positive(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}
