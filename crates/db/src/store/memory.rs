//! In-process implementation of [`Store`].
//!
//! All tables live behind one `tokio::sync::RwLock`, so every write
//! (including the project cascade) is atomic with respect to readers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use taskboard_core::activity::NewActivity;
use taskboard_core::contract::{NewProject, NewTask, ProjectPatch, TaskPatch};
use taskboard_core::models::{ActivityLog, ActivityWithActor, Project, Task, User};
use taskboard_core::types::{entity, DbId};
use tokio::sync::RwLock;

use super::{NewUser, Store, StoreError, StoreResult, UserCredentials};

#[derive(Debug, Default)]
struct Tables {
    projects: BTreeMap<DbId, Project>,
    tasks: BTreeMap<DbId, Task>,
    activity: Vec<ActivityLog>,
    users: BTreeMap<DbId, UserCredentials>,
    last_id: DbId,
}

impl Tables {
    /// Ids are unique across tables; only their order matters to callers.
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    /// `MissingReference` if `user_id` names no stored user.
    fn require_user(&self, user_id: Option<DbId>) -> StoreResult<()> {
        match user_id {
            Some(id) if !self.users.contains_key(&id) => Err(StoreError::MissingReference {
                entity: entity::USER,
                id,
            }),
            _ => Ok(()),
        }
    }
}

/// [`Store`] holding everything in memory. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables.projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn create_project(&self, input: &NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        tables.require_user(input.owner_id)?;
        let now = Utc::now();
        let project = Project {
            id: tables.next_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            status: input.status,
            owner_id: input.owner_id,
            start_date: Some(input.start_date.unwrap_or(now)),
            due_date: input.due_date,
            created_at: now,
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.get_mut(&id).map(|project| {
            patch.apply_to(project);
            project.clone()
        }))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, task| task.project_id != id);
        Ok(true)
    }

    async fn list_tasks(&self, project_id: Option<DbId>) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|task| project_id.map_or(true, |p| task.project_id == p))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&input.project_id) {
            return Err(StoreError::MissingReference {
                entity: entity::PROJECT,
                id: input.project_id,
            });
        }
        tables.require_user(input.assignee_id)?;
        let task = Task {
            id: tables.next_id(),
            project_id: input.project_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            assignee_id: input.assignee_id,
            due_date: input.due_date,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: DbId, patch: &TaskPatch) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&id) {
            return Ok(None);
        }
        tables.require_user(patch.assignee_id.flatten())?;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            patch.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }

    async fn list_recent_activity(&self, limit: i64) -> StoreResult<Vec<ActivityWithActor>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<&ActivityLog> = tables.activity.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(entries
            .into_iter()
            .take(limit)
            .map(|log| ActivityWithActor {
                user: log
                    .user_id
                    .and_then(|id| tables.users.get(&id))
                    .map(|c| c.user.clone()),
                log: log.clone(),
            })
            .collect())
    }

    async fn append_activity(&self, entry: &NewActivity) -> StoreResult<ActivityLog> {
        let mut tables = self.tables.write().await;
        let log = ActivityLog {
            id: tables.next_id(),
            user_id: entry.user_id,
            project_id: entry.project_id,
            action: entry.action,
            details: entry.details.clone(),
            created_at: Utc::now(),
        };
        tables.activity.push(log.clone());
        Ok(log)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).map(|c| c.user.clone()))
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn create_user(&self, input: &NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|c| c.user.username == input.username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            username: input.username.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            profile_image_url: input.profile_image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: input.password_hash.clone(),
            },
        );
        Ok(user)
    }
}
