//! The mutation and audit service.
//!
//! Every write goes through [`WorkService`]: it checks the principal, applies
//! the status transition table, persists through the store, and appends the
//! matching activity entry after the write has committed and before the
//! result is returned. Reads are plain store calls.

use std::sync::Arc;

use taskboard_core::activity::NewActivity;
use taskboard_core::auth::Principal;
use taskboard_core::contract::{NewProject, NewTask, ProjectPatch, TaskPatch};
use taskboard_core::error::CoreError;
use taskboard_core::models::{ActivityWithActor, Project, ProjectWithTasks, Task};
use taskboard_core::types::{entity, DbId};
use taskboard_core::workflow::TransitionTable;
use taskboard_db::{Store, StoreError};

use crate::error::{AppError, AppResult};

fn project_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: entity::PROJECT,
        id,
    }
}

fn task_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: entity::TASK,
        id,
    }
}

fn unknown_project(id: DbId) -> CoreError {
    CoreError::invalid_field("projectId", format!("Project with id {id} does not exist"))
}

fn unknown_assignee(id: DbId) -> CoreError {
    CoreError::invalid_field("assigneeId", format!("User with id {id} does not exist"))
}

fn actor_gone() -> CoreError {
    CoreError::Unauthorized("User no longer exists".into())
}

/// Map a reference that vanished between the service's check and the write
/// onto the same error the check would have produced.
fn dangling(err: StoreError, actor: DbId) -> AppError {
    match err {
        StoreError::MissingReference { entity: kind, id } if kind == entity::PROJECT => {
            unknown_project(id).into()
        }
        StoreError::MissingReference { entity: kind, id } if kind == entity::USER => {
            if id == actor {
                actor_gone().into()
            } else {
                unknown_assignee(id).into()
            }
        }
        other => other.into(),
    }
}

pub struct WorkService {
    store: Arc<dyn Store>,
    transitions: TransitionTable,
}

impl WorkService {
    pub fn new(store: Arc<dyn Store>, transitions: TransitionTable) -> Self {
        Self { store, transitions }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    async fn user_exists(&self, id: DbId) -> AppResult<bool> {
        Ok(self.store.find_user(id).await?.is_some())
    }

    /// Append an activity entry for a write that already committed.
    ///
    /// A failure here does not undo the write; it is reported to the
    /// operational log and the request still succeeds.
    async fn record(&self, entry: NewActivity) {
        if let Err(e) = self.store.append_activity(&entry).await {
            tracing::error!(
                action = %entry.action,
                user_id = ?entry.user_id,
                project_id = ?entry.project_id,
                error = %e,
                "Failed to append activity entry"
            );
        }
    }

    // -- projects --

    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn get_project(&self, id: DbId) -> AppResult<ProjectWithTasks> {
        let project = self
            .store
            .get_project(id)
            .await?
            .ok_or_else(|| project_not_found(id))?;
        let tasks = self.store.list_tasks(Some(id)).await?;
        Ok(ProjectWithTasks { project, tasks })
    }

    pub async fn create_project(
        &self,
        principal: Principal,
        mut input: NewProject,
    ) -> AppResult<Project> {
        let actor = principal.require_user()?;
        if !self.user_exists(actor).await? {
            return Err(actor_gone().into());
        }
        input.owner_id = Some(actor);

        let project = self
            .store
            .create_project(&input)
            .await
            .map_err(|e| dangling(e, actor))?;
        tracing::info!(project_id = project.id, user_id = actor, "Project created");

        self.record(NewActivity::created_project(actor, &project)).await;
        Ok(project)
    }

    pub async fn update_project(
        &self,
        principal: Principal,
        id: DbId,
        patch: ProjectPatch,
    ) -> AppResult<Project> {
        let actor = principal.require_user()?;
        let project = self
            .store
            .update_project(id, &patch)
            .await?
            .ok_or_else(|| project_not_found(id))?;
        tracing::info!(project_id = id, user_id = actor, "Project updated");

        self.record(NewActivity::updated_project(actor, &project)).await;
        Ok(project)
    }

    /// Delete a project and its tasks. No activity entry is written; entries
    /// already pointing at the project are kept.
    pub async fn delete_project(&self, principal: Principal, id: DbId) -> AppResult<()> {
        let actor = principal.require_user()?;
        if !self.store.delete_project(id).await? {
            return Err(project_not_found(id).into());
        }
        tracing::info!(project_id = id, user_id = actor, "Project deleted");
        Ok(())
    }

    // -- tasks --

    pub async fn list_tasks(&self, project_id: Option<DbId>) -> AppResult<Vec<Task>> {
        Ok(self.store.list_tasks(project_id).await?)
    }

    /// Create a task. The assignee defaults to the caller.
    pub async fn create_task(&self, principal: Principal, mut input: NewTask) -> AppResult<Task> {
        let actor = principal.require_user()?;
        if self.store.get_project(input.project_id).await?.is_none() {
            return Err(unknown_project(input.project_id).into());
        }
        let requested = input.assignee_id;
        match requested {
            Some(assignee) if !self.user_exists(assignee).await? => {
                return Err(unknown_assignee(assignee).into());
            }
            Some(_) => {}
            None if !self.user_exists(actor).await? => return Err(actor_gone().into()),
            None => input.assignee_id = Some(actor),
        }

        let task = self
            .store
            .create_task(&input)
            .await
            .map_err(|e| dangling(e, actor))?;
        tracing::info!(
            task_id = task.id,
            project_id = task.project_id,
            user_id = actor,
            "Task created"
        );

        self.record(NewActivity::created_task(actor, &task)).await;
        Ok(task)
    }

    /// Apply a task patch.
    ///
    /// When the patch carries a status, the move is checked against the
    /// transition table and one `updated_task_status` entry is appended,
    /// even if the status is unchanged.
    pub async fn update_task(
        &self,
        principal: Principal,
        id: DbId,
        patch: TaskPatch,
    ) -> AppResult<Task> {
        let actor = principal.require_user()?;

        if let Some(Some(assignee)) = patch.assignee_id {
            if !self.user_exists(assignee).await? {
                return Err(unknown_assignee(assignee).into());
            }
        }

        if let Some(to) = patch.status {
            let current = self
                .store
                .get_task(id)
                .await?
                .ok_or_else(|| task_not_found(id))?;
            if current.status != to {
                self.transitions
                    .check(current.status, to)
                    .map_err(|e| CoreError::Validation(e.into()))?;
            }
        }

        let task = self
            .store
            .update_task(id, &patch)
            .await
            .map_err(|e| dangling(e, actor))?
            .ok_or_else(|| task_not_found(id))?;
        tracing::info!(task_id = id, user_id = actor, status = %task.status, "Task updated");

        if let Some(to) = patch.status {
            self.record(NewActivity::moved_task(actor, &task, to)).await;
        }
        Ok(task)
    }

    pub async fn delete_task(&self, principal: Principal, id: DbId) -> AppResult<()> {
        let actor = principal.require_user()?;
        if !self.store.delete_task(id).await? {
            return Err(task_not_found(id).into());
        }
        tracing::info!(task_id = id, user_id = actor, "Task deleted");
        Ok(())
    }

    // -- activity --

    pub async fn recent_activity(&self, limit: i64) -> AppResult<Vec<ActivityWithActor>> {
        Ok(self.store.list_recent_activity(limit).await?)
    }
}
