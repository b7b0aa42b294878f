//! Dashboard summary figures computed from the project and task lists.

use taskboard_core::models::{Project, Task};
use taskboard_core::status::{ProjectStatus, TaskPriority, TaskStatus};
use taskboard_core::types::DbId;

/// Completion of one project, as a whole percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    pub project_id: DbId,
    pub name: String,
    pub total: usize,
    pub done: usize,
    /// `0` for a project without tasks.
    pub percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub active_projects: usize,
    pub completed_tasks: usize,
    /// Every task not yet `done`.
    pub pending_tasks: usize,
    /// `high` priority tasks not yet `done`.
    pub high_priority_open: usize,
    /// One entry per project, in the order given.
    pub progress: Vec<ProjectProgress>,
}

impl BoardStats {
    pub fn compute(projects: &[Project], tasks: &[Task]) -> Self {
        let completed_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        let high_priority_open = tasks
            .iter()
            .filter(|t| t.priority == TaskPriority::High && t.status != TaskStatus::Done)
            .count();

        let progress = projects
            .iter()
            .map(|project| {
                let own: Vec<&Task> = tasks
                    .iter()
                    .filter(|t| t.project_id == project.id)
                    .collect();
                let done = own.iter().filter(|t| t.status == TaskStatus::Done).count();
                ProjectProgress {
                    project_id: project.id,
                    name: project.name.clone(),
                    total: own.len(),
                    done,
                    percent: percent(done, own.len()),
                }
            })
            .collect();

        Self {
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            completed_tasks,
            pending_tasks: tasks.len() - completed_tasks,
            high_priority_open,
            progress,
        }
    }
}

/// Rounded to the nearest whole percent, halves up.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done * 200 + total) / (total * 2)) as u8
}
