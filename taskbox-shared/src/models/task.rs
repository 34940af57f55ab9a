/// Task model and the ownership-scoped store
///
/// Tasks are personal: every read path is expressed as "within one owner's
/// collection", never a global lookup by bare id. That scoping is the whole
/// authorization mechanism — a caller probing another user's task id gets
/// the same not-found outcome as a genuinely missing id.
///
/// Tasks are soft-deleted: the user-facing destroy path sets `deleted_at`
/// instead of removing the row. Soft-deleted rows are invisible to every
/// default query and only reachable through [`Task::find_including_deleted`].
/// The only hard delete is the cascade when the owning user is removed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BLOB PRIMARY KEY NOT NULL,
///     user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     completed INTEGER NOT NULL DEFAULT 0,
///     deleted_at TEXT,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskbox_shared::models::task::{CreateTask, Task};
/// use taskbox_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, owner, CreateTask {
///     title: "Water the plants".to_string(),
///     completed: false,
/// }).await?;
///
/// Task::soft_delete(&pool, task.id).await?;
/// assert!(Task::find(&pool, owner, task.id).await.is_err());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Column list shared by every task query so `RETURNING` and `SELECT`
/// shapes always match the struct.
const TASK_COLUMNS: &str = "id, user_id, title, completed, deleted_at, created_at, updated_at";

/// Predicate marking a row as not soft-deleted.
///
/// Every default query path must include this filter. Reads get it through
/// [`scoped_select`], writes reference it directly; nothing else in the
/// crate spells out `deleted_at` checks.
const ACTIVE: &str = "deleted_at IS NULL";

/// Builds a SELECT over active tasks with an additional predicate.
///
/// This is the single point where default read queries are constructed, so
/// a new call site cannot forget the soft-delete filter.
fn scoped_select(predicate: &str) -> String {
    format!("SELECT {TASK_COLUMNS} FROM tasks WHERE {ACTIVE} AND {predicate}")
}

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// One or more fields failed validation; recoverable by resubmission
    #[error("task validation failed")]
    Validation(Vec<FieldError>),

    /// Task absent, soft-deleted, or owned by someone else — the three
    /// cases are deliberately indistinguishable
    #[error("task not found")]
    NotFound,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Task model representing one item on a user's list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user; set at creation and never reassigned
    pub user_id: Uuid,

    /// Task title (non-empty)
    pub title: String,

    /// Completion flag (defaults to false)
    pub completed: bool,

    /// Soft-delete marker; None = active
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title (must be non-blank)
    pub title: String,

    /// Completion flag (defaults to false when omitted)
    #[serde(default)]
    pub completed: bool,
}

/// Input for updating a task
///
/// Only non-None fields are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title (must be non-blank when present)
    pub title: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Rejects blank titles with a structured field error
fn validate_title(title: &str) -> Result<(), TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::Validation(vec![FieldError {
            field: "title".to_string(),
            message: "can't be blank".to_string(),
        }]));
    }
    Ok(())
}

impl Task {
    /// Lists all active tasks belonging to `owner`, oldest first
    ///
    /// An owner with no tasks gets an empty Vec, never an error.
    pub async fn list(pool: &SqlitePool, owner: Uuid) -> Result<Vec<Self>, TaskError> {
        let sql = format!("{} ORDER BY created_at ASC, id ASC", scoped_select("user_id = ?"));

        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Finds the active task with `id` inside `owner`'s collection
    ///
    /// The lookup happens within the owner's partition; there is no global
    /// fetch followed by an ownership comparison. Missing, soft-deleted,
    /// and foreign-owned ids all come back as [`TaskError::NotFound`].
    pub async fn find(pool: &SqlitePool, owner: Uuid, id: Uuid) -> Result<Self, TaskError> {
        let sql = scoped_select("user_id = ? AND id = ?");

        sqlx::query_as::<_, Task>(&sql)
            .bind(owner)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Fetches a task by id regardless of owner or soft-delete state
    ///
    /// Bypass for administrative and test verification only; no request
    /// handler goes through here.
    pub async fn find_including_deleted(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Validates and inserts a new task owned by `owner`
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Validation`] when the title is blank; nothing is
    /// persisted in that case.
    pub async fn create(
        pool: &SqlitePool,
        owner: Uuid,
        data: CreateTask,
    ) -> Result<Self, TaskError> {
        validate_title(&data.title)?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(&data.title)
            .bind(data.completed)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Re-validates and persists title/completed changes
    ///
    /// Scoped to `owner`'s active collection like every other default path.
    ///
    /// # Errors
    ///
    /// - [`TaskError::Validation`] when the new title is blank
    /// - [`TaskError::NotFound`] when no active task matches
    pub async fn update(
        pool: &SqlitePool,
        owner: Uuid,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Self, TaskError> {
        if let Some(ref title) = data.title {
            validate_title(title)?;
        }

        let mut assignments = vec!["updated_at = ?"];
        if data.title.is_some() {
            assignments.push("title = ?");
        }
        if data.completed.is_some() {
            assignments.push("completed = ?");
        }

        let sql = format!(
            "UPDATE tasks SET {} WHERE {ACTIVE} AND user_id = ? AND id = ? \
             RETURNING {TASK_COLUMNS}",
            assignments.join(", ")
        );

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(Utc::now());
        if let Some(title) = data.title {
            query = query.bind(title);
        }
        if let Some(completed) = data.completed {
            query = query.bind(completed);
        }

        query
            .bind(owner)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Marks a task as deleted by setting `deleted_at` to the current time
    ///
    /// Idempotent in effect: a second call leaves the row untouched,
    /// including the original marker. Returns whether a row changed.
    pub async fn soft_delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let sql = format!("UPDATE tasks SET deleted_at = ?, updated_at = ? WHERE {ACTIVE} AND id = ?");

        let result = sqlx::query(&sql)
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts `owner`'s active tasks
    pub async fn count_active(pool: &SqlitePool, owner: Uuid) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM tasks WHERE {ACTIVE} AND user_id = ?");

        let (count,): (i64,) = sqlx::query_as(&sql).bind(owner).fetch_one(pool).await?;

        Ok(count)
    }

    /// Counts `owner`'s tasks including soft-deleted rows
    ///
    /// Verification counterpart of [`Task::count_active`]; lets tests assert
    /// that destroy hides a row without dropping it.
    pub async fn count_including_deleted(
        pool: &SqlitePool,
        owner: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
            .bind(owner)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
