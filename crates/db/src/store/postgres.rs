//! PostgreSQL implementation of [`Store`].
//!
//! Enumerated columns are stored as TEXT and parsed on the way out, so a
//! row holding a value outside the vocabulary surfaces as
//! [`StoreError::Corrupt`] instead of being coerced.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use taskboard_core::activity::{ActivityAction, NewActivity};
use taskboard_core::contract::{NewProject, NewTask, ProjectPatch, TaskPatch};
use taskboard_core::models::{ActivityLog, ActivityWithActor, Project, Task, User};
use taskboard_core::types::{entity, DbId, Timestamp};

use super::{NewUser, Store, StoreError, StoreResult, UserCredentials};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const PROJECT_COLUMNS: &str =
    "id, name, description, status, owner_id, start_date, due_date, created_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, \
     assignee_id, due_date, created_at";

const ACTIVITY_COLUMNS: &str = "id, user_id, project_id, action, details, created_at";

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, profile_image_url, created_at, updated_at";

/// Activity joined with its actor; actor columns are prefixed `u_`.
const ACTIVITY_JOIN_COLUMNS: &str = "a.id, a.user_id, a.project_id, a.action, a.details, \
     a.created_at, u.id AS u_id, u.username AS u_username, u.first_name AS u_first_name, \
     u.last_name AS u_last_name, u.profile_image_url AS u_profile_image_url, \
     u.created_at AS u_created_at, u.updated_at AS u_updated_at";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

fn parse_text<T: std::str::FromStr>(
    entity: &'static str,
    id: DbId,
    value: &str,
) -> StoreResult<T>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| StoreError::Corrupt {
        entity,
        id,
        reason: e.to_string(),
    })
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: DbId,
    name: String,
    description: Option<String>,
    status: String,
    owner_id: Option<DbId>,
    start_date: Option<Timestamp>,
    due_date: Option<Timestamp>,
    created_at: Timestamp,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> StoreResult<Self> {
        Ok(Project {
            status: parse_text(entity::PROJECT, row.id, &row.status)?,
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
            start_date: row.start_date,
            due_date: row.due_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: DbId,
    project_id: DbId,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    assignee_id: Option<DbId>,
    due_date: Option<Timestamp>,
    created_at: Timestamp,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> StoreResult<Self> {
        Ok(Task {
            status: parse_text(entity::TASK, row.id, &row.status)?,
            priority: parse_text(entity::TASK, row.id, &row.priority)?,
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            assignee_id: row.assignee_id,
            due_date: row.due_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: DbId,
    username: String,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image_url: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_image_url: row.profile_image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: DbId,
    user_id: Option<DbId>,
    project_id: Option<DbId>,
    action: String,
    details: Option<String>,
    created_at: Timestamp,
}

impl TryFrom<ActivityRow> for ActivityLog {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> StoreResult<Self> {
        Ok(ActivityLog {
            action: parse_text::<ActivityAction>("ActivityLog", row.id, &row.action)?,
            id: row.id,
            user_id: row.user_id,
            project_id: row.project_id,
            details: row.details,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ActivityJoinRow {
    #[sqlx(flatten)]
    log: ActivityRow,
    u_id: Option<DbId>,
    u_username: Option<String>,
    u_first_name: Option<String>,
    u_last_name: Option<String>,
    u_profile_image_url: Option<String>,
    u_created_at: Option<Timestamp>,
    u_updated_at: Option<Timestamp>,
}

impl TryFrom<ActivityJoinRow> for ActivityWithActor {
    type Error = StoreError;

    fn try_from(row: ActivityJoinRow) -> StoreResult<Self> {
        let user = match (row.u_id, row.u_username, row.u_created_at, row.u_updated_at) {
            (Some(id), Some(username), Some(created_at), Some(updated_at)) => Some(User {
                id,
                username,
                first_name: row.u_first_name,
                last_name: row.u_last_name,
                profile_image_url: row.u_profile_image_url,
                created_at,
                updated_at,
            }),
            _ => None,
        };
        Ok(ActivityWithActor {
            log: row.log.try_into()?,
            user,
        })
    }
}

/// Map unique-constraint violations (`23505`) onto [`StoreError::Conflict`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return StoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    StoreError::Database(err)
}

/// PostgreSQL `foreign_key_violation` on the given constraint.
fn violates_foreign_key(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23503") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// `tasks.assignee_id` pointing at no user becomes a missing reference.
fn unknown_assignee(err: sqlx::Error, assignee_id: Option<DbId>) -> StoreError {
    match assignee_id {
        Some(id) if violates_foreign_key(&err, "tasks_assignee_id_fkey") => {
            StoreError::MissingReference {
                entity: entity::USER,
                id,
            }
        }
        _ => classify(err),
    }
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// [`Store`] backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let query =
            format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Project::try_from)
            .collect()
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn create_project(&self, input: &NewProject) -> StoreResult<Project> {
        let query = format!(
            "INSERT INTO projects (name, description, status, owner_id, start_date, due_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6)
             RETURNING {PROJECT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.owner_id)
            .bind(input.start_date)
            .bind(input.due_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match input.owner_id {
                Some(id) if violates_foreign_key(&e, "projects_owner_id_fkey") => {
                    StoreError::MissingReference {
                        entity: entity::USER,
                        id,
                    }
                }
                _ => classify(e),
            })?;
        row.try_into()
    }

    async fn update_project(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> StoreResult<Option<Project>> {
        // Nullable columns take a "was provided" flag plus the new value so
        // that an explicit null clears the column.
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                start_date = COALESCE($6, start_date),
                due_date = CASE WHEN $7 THEN $8 ELSE due_date END
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.start_date)
            .bind(patch.due_date.is_some())
            .bind(patch.due_date.flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .map(Project::try_from)
            .transpose()
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            project_id = id,
            tasks_deleted = tasks.rows_affected(),
            "Project deleted"
        );
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, project_id: Option<DbId>) -> StoreResult<Vec<Task>> {
        let rows = match project_id {
            Some(project_id) => {
                let query =
                    format!("SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
                sqlx::query_as::<_, TaskRow>(&query)
                    .bind(project_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");
                sqlx::query_as::<_, TaskRow>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        let query = format!(
            "INSERT INTO tasks
                (project_id, title, description, status, priority, assignee_id, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.assignee_id)
            .bind(input.due_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if violates_foreign_key(&e, "tasks_project_id_fkey") {
                    StoreError::MissingReference {
                        entity: entity::PROJECT,
                        id: input.project_id,
                    }
                } else {
                    unknown_assignee(e, input.assignee_id)
                }
            })?;
        row.try_into()
    }

    async fn update_task(&self, id: DbId, patch: &TaskPatch) -> StoreResult<Option<Task>> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                assignee_id = CASE WHEN $7 THEN $8 ELSE assignee_id END,
                due_date = CASE WHEN $9 THEN $10 ELSE due_date END
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.priority.map(|p| p.as_str()))
            .bind(patch.assignee_id.is_some())
            .bind(patch.assignee_id.flatten())
            .bind(patch.due_date.is_some())
            .bind(patch.due_date.flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unknown_assignee(e, patch.assignee_id.flatten()))?
            .map(Task::try_from)
            .transpose()
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityWithActor>> {
        let query = format!(
            "SELECT {ACTIVITY_JOIN_COLUMNS}
             FROM activity_logs a
             LEFT JOIN users u ON u.id = a.user_id
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ActivityJoinRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ActivityWithActor::try_from)
            .collect()
    }

    async fn append_activity(&self, entry: &NewActivity) -> StoreResult<ActivityLog> {
        let query = format!(
            "INSERT INTO activity_logs (user_id, project_id, action, details)
             VALUES ($1, $2, $3, $4)
             RETURNING {ACTIVITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ActivityRow>(&query)
            .bind(entry.user_id)
            .bind(entry.project_id)
            .bind(entry.action.as_str())
            .bind(&entry.details)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        let query = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, CredentialsRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| UserCredentials {
            user: r.user.into(),
            password_hash: r.password_hash,
        }))
    }

    async fn create_user(&self, input: &NewUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (username, password_hash, first_name, last_name, profile_image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.profile_image_url)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }
}
