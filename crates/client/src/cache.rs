//! Read cache keyed by operation and scope.
//!
//! `Tasks(Some(7))` and `Tasks(None)` are separate entries: tasks of one
//! project are never served from, or mistaken for, the list of all tasks.

use std::collections::HashMap;

use taskboard_core::models::{ActivityWithActor, Project, ProjectWithTasks, Task};
use taskboard_core::types::DbId;

use crate::api::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Projects,
    Project(DbId),
    /// Task list, optionally scoped to one project.
    Tasks(Option<DbId>),
    Activity,
}

#[derive(Debug, Clone, PartialEq)]
enum Cached {
    Projects(Vec<Project>),
    Project(ProjectWithTasks),
    Tasks(Vec<Task>),
    Activity(Vec<ActivityWithActor>),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Cached>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: QueryKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop cached data for `key`.
    ///
    /// Any `Tasks(_)` key drops every task scope, since a task change can
    /// alter both a project's list and the global one. Other keys are exact.
    pub fn invalidate(&mut self, key: QueryKey) {
        match key {
            QueryKey::Tasks(_) => self
                .entries
                .retain(|k, _| !matches!(k, QueryKey::Tasks(_))),
            exact => {
                self.entries.remove(&exact);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // ---- typed accessors ----

    pub fn tasks(&self, scope: Option<DbId>) -> Option<&[Task]> {
        match self.entries.get(&QueryKey::Tasks(scope)) {
            Some(Cached::Tasks(tasks)) => Some(tasks),
            _ => None,
        }
    }

    pub fn put_tasks(&mut self, scope: Option<DbId>, tasks: Vec<Task>) {
        self.entries.insert(QueryKey::Tasks(scope), Cached::Tasks(tasks));
    }

    pub fn projects(&self) -> Option<&[Project]> {
        match self.entries.get(&QueryKey::Projects) {
            Some(Cached::Projects(projects)) => Some(projects),
            _ => None,
        }
    }

    pub fn put_projects(&mut self, projects: Vec<Project>) {
        self.entries
            .insert(QueryKey::Projects, Cached::Projects(projects));
    }

    pub fn project(&self, id: DbId) -> Option<&ProjectWithTasks> {
        match self.entries.get(&QueryKey::Project(id)) {
            Some(Cached::Project(project)) => Some(project),
            _ => None,
        }
    }

    pub fn put_project(&mut self, project: ProjectWithTasks) {
        self.entries.insert(
            QueryKey::Project(project.project.id),
            Cached::Project(project),
        );
    }

    pub fn activity(&self) -> Option<&[ActivityWithActor]> {
        match self.entries.get(&QueryKey::Activity) {
            Some(Cached::Activity(entries)) => Some(entries),
            _ => None,
        }
    }

    pub fn put_activity(&mut self, entries: Vec<ActivityWithActor>) {
        self.entries
            .insert(QueryKey::Activity, Cached::Activity(entries));
    }

    // ---- fetch-through ----

    /// Cached tasks for `scope`, fetching them on a miss.
    pub async fn load_tasks(
        &mut self,
        api: &ApiClient,
        scope: Option<DbId>,
    ) -> Result<Vec<Task>, ClientError> {
        if let Some(tasks) = self.tasks(scope) {
            return Ok(tasks.to_vec());
        }
        let tasks = api.list_tasks(scope).await?;
        self.put_tasks(scope, tasks.clone());
        Ok(tasks)
    }

    pub async fn load_projects(&mut self, api: &ApiClient) -> Result<Vec<Project>, ClientError> {
        if let Some(projects) = self.projects() {
            return Ok(projects.to_vec());
        }
        let projects = api.list_projects().await?;
        self.put_projects(projects.clone());
        Ok(projects)
    }

    pub async fn load_project(
        &mut self,
        api: &ApiClient,
        id: DbId,
    ) -> Result<ProjectWithTasks, ClientError> {
        if let Some(project) = self.project(id) {
            return Ok(project.clone());
        }
        let project = api.get_project(id).await?;
        self.put_project(project.clone());
        Ok(project)
    }

    pub async fn load_activity(
        &mut self,
        api: &ApiClient,
    ) -> Result<Vec<ActivityWithActor>, ClientError> {
        if let Some(entries) = self.activity() {
            return Ok(entries.to_vec());
        }
        let entries = api.list_activity(None).await?;
        self.put_activity(entries.clone());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use taskboard_core::status::{TaskPriority, TaskStatus};

    use super::*;

    fn task(id: DbId, project_id: DbId) -> Task {
        Task {
            id,
            project_id,
            title: format!("task {id}"),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assignee_id: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn scopes_are_distinct_entries() {
        let mut cache = QueryCache::new();
        cache.put_tasks(Some(7), vec![task(1, 7)]);
        cache.put_tasks(None, vec![task(1, 7), task(2, 8)]);

        assert_eq!(cache.tasks(Some(7)).unwrap().len(), 1);
        assert_eq!(cache.tasks(None).unwrap().len(), 2);
        assert!(cache.tasks(Some(8)).is_none());
    }

    #[test]
    fn task_invalidation_drops_every_scope() {
        let mut cache = QueryCache::new();
        cache.put_tasks(Some(7), vec![task(1, 7)]);
        cache.put_tasks(Some(8), vec![task(2, 8)]);
        cache.put_tasks(None, vec![]);
        cache.put_projects(vec![]);

        cache.invalidate(QueryKey::Tasks(Some(7)));

        assert!(!cache.contains(QueryKey::Tasks(Some(7))));
        assert!(!cache.contains(QueryKey::Tasks(Some(8))));
        assert!(!cache.contains(QueryKey::Tasks(None)));
        assert!(cache.contains(QueryKey::Projects));
    }

    #[test]
    fn project_invalidation_is_exact() {
        let mut cache = QueryCache::new();
        cache.entries.insert(QueryKey::Project(1), Cached::Tasks(vec![]));
        cache.entries.insert(QueryKey::Project(2), Cached::Tasks(vec![]));

        cache.invalidate(QueryKey::Project(1));

        assert!(!cache.contains(QueryKey::Project(1)));
        assert!(cache.contains(QueryKey::Project(2)));
    }
}
