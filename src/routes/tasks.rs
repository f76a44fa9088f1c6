use crate::{
    auth::{AdminUser, CurrentUser},
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    store::{TaskListParams, TaskStore},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Creates a new task.
///
/// Expects a JSON payload conforming to `TaskInput`. The task's `createdBy`
/// is always the authenticated caller's id: a `createdBy` key in the body is
/// an unknown field and is dropped at deserialization, so it cannot be
/// spoofed. The store assigns `id` and `createdAt`.
///
/// ## Responses:
/// - `201 Created`: the newly created `Task`.
/// - `400 Bad Request`: malformed JSON or a missing required `title`.
/// - `401 Unauthorized`: no valid authentication token.
/// - `422 Unprocessable Entity`: field-rule violation (e.g. title too long).
/// - `500 Internal Server Error`: store failure.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn TaskStore>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store.insert_task(task_data.into_inner(), user.id).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Lists tasks with optional filtering, sorting, and pagination.
///
/// Visible to any authenticated user; listing is not scoped to the caller.
///
/// ## Query Parameters:
/// - `status` (optional): exact-match status filter ("open", "in-progress", "done").
/// - `search` (optional): case-insensitive substring match against the title.
/// - `sortBy` (optional): `"asc"` sorts by creation time ascending, any other
///   non-empty value descending; absent leaves the store's default order.
/// - `page` (optional, default 1) and `limit` (optional, default 10): the
///   pagination window. Non-numeric values fall back to the defaults.
///
/// Both filters combine with AND. No total count or has-more indicator is
/// returned; a page past the data is simply empty.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects, possibly empty.
/// - `400 Bad Request`: unknown `status` value.
/// - `401 Unauthorized`: no valid authentication token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn TaskStore>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let params = TaskListParams::from(query_params.into_inner());
    let tasks = store.list_tasks(params).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a specific task by its id.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `400 Bad Request`: the path id is not a valid UUID.
/// - `401 Unauthorized`: no valid authentication token.
/// - `404 Not Found`: no task with that id.
/// - `500 Internal Server Error`: store failure.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn TaskStore>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store.get_task(task_id.into_inner()).await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Updates an existing task.
///
/// Expects a JSON payload conforming to `TaskUpdate`; only the provided
/// fields are applied, and the post-update document is returned. `id`,
/// `createdBy`, and `createdAt` are not part of the update shape and can
/// never be overwritten.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: the path id is not a valid UUID, or malformed JSON.
/// - `401 Unauthorized`: no valid authentication token.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: field-rule violation.
/// - `500 Internal Server Error`: store failure.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn TaskStore>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .update_task(task_id.into_inner(), task_data.into_inner())
        .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task by its id. Admin only.
///
/// The admin gate runs before the handler body: a non-admin caller gets 403
/// and the task is untouched. Deletion is permanent; deleting an
/// already-deleted id is a plain 404, same as any other miss.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`.
/// - `400 Bad Request`: the path id is not a valid UUID.
/// - `401 Unauthorized`: no valid authentication token.
/// - `403 Forbidden`: authenticated but not admin.
/// - `404 Not Found`: no task with that id.
/// - `500 Internal Server Error`: store failure.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn TaskStore>,
    task_id: web::Path<Uuid>,
    _admin: AdminUser,
) -> Result<impl Responder, AppError> {
    let deleted = store.delete_task(task_id.into_inner()).await?;

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
