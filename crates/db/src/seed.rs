//! Demo data for a fresh installation.

use chrono::{Duration, Utc};
use taskboard_core::activity::NewActivity;
use taskboard_core::contract::{NewProject, NewTask};
use taskboard_core::status::{ProjectStatus, TaskPriority, TaskStatus};
use taskboard_core::types::DbId;

use crate::store::{NewUser, Store, StoreResult};

pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "admin123";

/// What [`seed_demo_data`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub admin_id: DbId,
    pub created_admin: bool,
    /// `Some` when the welcome project was created on this run.
    pub welcome_project_id: Option<DbId>,
}

/// Ensure the demo admin exists and, if there are no projects yet, create
/// the welcome project with two tasks and a `system_init` entry.
///
/// Safe to run on every start: each step is skipped when its data exists.
/// `admin_password_hash` is the already-hashed [`DEMO_PASSWORD`].
pub async fn seed_demo_data(
    store: &dyn Store,
    admin_password_hash: &str,
) -> StoreResult<SeedOutcome> {
    let (admin_id, created_admin) = match store.find_user_by_username(DEMO_USERNAME).await? {
        Some(existing) => (existing.user.id, false),
        None => {
            let user = store
                .create_user(&NewUser {
                    username: DEMO_USERNAME.to_string(),
                    password_hash: admin_password_hash.to_string(),
                    first_name: Some("Admin".to_string()),
                    last_name: Some("User".to_string()),
                    profile_image_url: None,
                })
                .await?;
            tracing::info!(user_id = user.id, "Created demo admin user");
            (user.id, true)
        }
    };

    if !store.list_projects().await?.is_empty() {
        tracing::debug!("Projects already exist, skipping welcome project");
        return Ok(SeedOutcome {
            admin_id,
            created_admin,
            welcome_project_id: None,
        });
    }

    let now = Utc::now();
    let project = store
        .create_project(&NewProject {
            name: "Welcome Project".to_string(),
            description: Some("This is a sample project to get you started.".to_string()),
            status: ProjectStatus::Active,
            owner_id: Some(admin_id),
            start_date: Some(now),
            due_date: Some(now + Duration::days(30)),
        })
        .await?;

    store
        .create_task(&NewTask {
            project_id: project.id,
            title: "Explore the dashboard".to_string(),
            description: Some("Check out the project statistics and activity feed.".to_string()),
            status: TaskStatus::Done,
            priority: TaskPriority::High,
            assignee_id: Some(admin_id),
            due_date: Some(now + Duration::days(1)),
        })
        .await?;

    store
        .create_task(&NewTask {
            project_id: project.id,
            title: "Create your first project".to_string(),
            description: Some(
                "Click the 'New Project' button to start managing your own work.".to_string(),
            ),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assignee_id: Some(admin_id),
            due_date: Some(now + Duration::days(7)),
        })
        .await?;

    store
        .append_activity(&NewActivity::system_init(Some(admin_id), Some(project.id)))
        .await?;

    tracing::info!(project_id = project.id, "Seeded welcome project");
    Ok(SeedOutcome {
        admin_id,
        created_admin,
        welcome_project_id: Some(project.id),
    })
}

#[cfg(test)]
mod tests {
    use taskboard_core::activity::ActivityAction;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryStore::new();

        let first = seed_demo_data(&store, "hash").await.unwrap();
        assert!(first.created_admin);
        let project_id = first.welcome_project_id.unwrap();

        let tasks = store.list_tasks(Some(project_id)).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[1].status, TaskStatus::Todo);

        let activity = store.list_recent_activity(20).await.unwrap();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].log.action, ActivityAction::SystemInit);
        assert_eq!(activity[0].user.as_ref().map(|u| u.username.as_str()), Some("admin"));

        let second = seed_demo_data(&store, "hash").await.unwrap();
        assert!(!second.created_admin);
        assert_eq!(second.admin_id, first.admin_id);
        assert_eq!(second.welcome_project_id, None);
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }
}
