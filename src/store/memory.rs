use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskInput, TaskUpdate, User};
use crate::store::{SortOrder, TaskListParams, TaskStore, UserStore};

/// In-process store with the same observable semantics as `PgStore`.
///
/// Backs the integration suite so the full HTTP contract runs without a
/// database. Tasks keep insertion order, which is the "store default order"
/// the list endpoint exposes when no sort is requested.
#[derive(Default)]
pub struct MemStore {
    tasks: Mutex<Vec<Task>>,
    users: Mutex<Vec<User>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemStore {
    async fn insert_task(&self, input: TaskInput, created_by: i32) -> Result<Task, AppError> {
        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            created_by,
            created_at: Utc::now(),
        };
        let mut tasks = self.tasks.lock().unwrap();
        tasks.push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, params: TaskListParams) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        let needle = params.search.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Task> = tasks
            .iter()
            .filter(|t| match params.status {
                Some(status) => t.status == Some(status),
                None => true,
            })
            .filter(|t| match &needle {
                Some(needle) => t.title.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        // Stable sorts: equal timestamps keep insertion order either way,
        // matching ORDER BY created_at in the SQL store.
        match params.sort {
            Some(SortOrder::Asc) => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            Some(SortOrder::Desc) => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            None => {}
        }

        let skip = params.skip.max(0) as usize;
        let limit = params.limit.max(0) as usize;
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                if let Some(title) = update.title {
                    task.title = title;
                }
                if let Some(description) = update.description {
                    task.description = Some(description);
                }
                if let Some(status) = update.status {
                    task.status = Some(status);
                }
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i32 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
