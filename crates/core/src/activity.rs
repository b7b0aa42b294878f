//! Audit action vocabulary and activity entry construction.
//!
//! Activity rows are append-only. Each successful create, each project
//! update, and each task status change produces exactly one entry built by
//! the constructors on [`NewActivity`].

use crate::models::{Project, Task};
use crate::status::{define_text_enum, TaskStatus};
use crate::types::DbId;

define_text_enum! {
    /// Known action kinds for activity entries.
    ActivityAction ("activity action") {
        CreatedProject = "created_project",
        UpdatedProject = "updated_project",
        CreatedTask = "created_task",
        UpdatedTaskStatus = "updated_task_status",
        /// Written once by the demo data seeder.
        SystemInit = "system_init",
    }
}

/// An activity entry waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub action: ActivityAction,
    pub details: Option<String>,
}

impl NewActivity {
    pub fn created_project(actor: DbId, project: &Project) -> Self {
        Self {
            user_id: Some(actor),
            project_id: Some(project.id),
            action: ActivityAction::CreatedProject,
            details: Some(format!("Created project: {}", project.name)),
        }
    }

    pub fn updated_project(actor: DbId, project: &Project) -> Self {
        Self {
            user_id: Some(actor),
            project_id: Some(project.id),
            action: ActivityAction::UpdatedProject,
            details: Some(format!("Updated project: {}", project.name)),
        }
    }

    pub fn created_task(actor: DbId, task: &Task) -> Self {
        Self {
            user_id: Some(actor),
            project_id: Some(task.project_id),
            action: ActivityAction::CreatedTask,
            details: Some(format!("Created task: {}", task.title)),
        }
    }

    /// Entry for a status change. `to` is the requested status, which may
    /// equal the previous one; such requests are still recorded.
    pub fn moved_task(actor: DbId, task: &Task, to: TaskStatus) -> Self {
        Self {
            user_id: Some(actor),
            project_id: Some(task.project_id),
            action: ActivityAction::UpdatedTaskStatus,
            details: Some(format!("Moved task '{}' to {}", task.title, to)),
        }
    }

    pub fn system_init(actor: Option<DbId>, project_id: Option<DbId>) -> Self {
        Self {
            user_id: actor,
            project_id,
            action: ActivityAction::SystemInit,
            details: Some("System initialized with sample data".to_string()),
        }
    }
}
