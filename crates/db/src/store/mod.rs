//! The storage capability.
//!
//! Store methods apply no business rules beyond referential cascade: a
//! missing row is reported as `None` (or `false` for deletes) and the caller
//! decides what that means.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use taskboard_core::activity::NewActivity;
use taskboard_core::contract::{NewProject, NewTask, ProjectPatch, TaskPatch};
use taskboard_core::models::{ActivityLog, ActivityWithActor, Project, Task, User};
use taskboard_core::types::DbId;

/// Errors raised by a [`Store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row references another that does not exist (for example a task
    /// whose project was deleted concurrently).
    #[error("{entity} with id {id} does not exist")]
    MissingReference { entity: &'static str, id: DbId },

    /// A unique value is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored value could not be mapped onto the domain types.
    #[error("Corrupt {entity} row {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: DbId,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Input for provisioning a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// A user together with its credential material. Only used by login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Verify the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    // -- projects --

    /// All projects, newest first.
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>>;

    /// Insert a project. A missing `start_date` becomes the creation time.
    /// An `owner_id` naming no user is a [`StoreError::MissingReference`].
    async fn create_project(&self, input: &NewProject) -> StoreResult<Project>;

    /// Merge `patch` onto the project. `None` if it does not exist.
    async fn update_project(&self, id: DbId, patch: &ProjectPatch)
        -> StoreResult<Option<Project>>;

    /// Delete the project and all of its tasks atomically. Activity entries
    /// are left untouched. `false` if the project did not exist.
    async fn delete_project(&self, id: DbId) -> StoreResult<bool>;

    // -- tasks --

    /// All tasks, or those of one project, in id order.
    async fn list_tasks(&self, project_id: Option<DbId>) -> StoreResult<Vec<Task>>;

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>>;

    /// Insert a task. Fails with [`StoreError::MissingReference`] if the
    /// project or the assignee does not exist.
    async fn create_task(&self, input: &NewTask) -> StoreResult<Task>;

    /// `Ok(None)` for an unknown task; an unknown assignee is a
    /// [`StoreError::MissingReference`].
    async fn update_task(&self, id: DbId, patch: &TaskPatch) -> StoreResult<Option<Task>>;

    async fn delete_task(&self, id: DbId) -> StoreResult<bool>;

    // -- activity --

    /// The `limit` most recent entries, newest first, each joined with its
    /// actor when that user still exists.
    async fn list_recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityWithActor>>;

    async fn append_activity(&self, entry: &NewActivity) -> StoreResult<ActivityLog>;

    // -- users --

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str)
        -> StoreResult<Option<UserCredentials>>;

    /// Fails with [`StoreError::Conflict`] if the username is taken.
    async fn create_user(&self, input: &NewUser) -> StoreResult<User>;
}
