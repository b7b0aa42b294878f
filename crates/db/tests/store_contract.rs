//! Behaviour every `Store` implementation must share.
//!
//! Each check is written once against `&dyn Store` and run against the
//! in-memory store and, when a database is available, against PostgreSQL.

use assert_matches::assert_matches;
use sqlx::PgPool;
use taskboard_core::activity::{ActivityAction, NewActivity};
use taskboard_core::contract::{NewProject, NewTask, ProjectPatch, TaskPatch};
use taskboard_core::status::{ProjectStatus, TaskPriority, TaskStatus};
use taskboard_core::types::DbId;
use taskboard_db::{MemoryStore, NewUser, PgStore, Store, StoreError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: Some("desc".to_string()),
        status: ProjectStatus::Active,
        owner_id: None,
        start_date: None,
        due_date: None,
    }
}

fn new_task(project_id: DbId, title: &str) -> NewTask {
    NewTask {
        project_id,
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        assignee_id: None,
        due_date: None,
    }
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        first_name: Some("Test".to_string()),
        last_name: None,
        profile_image_url: None,
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

async fn create_then_get_round_trips(store: &dyn Store) {
    let created = store.create_project(&new_project("Launch")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.status, ProjectStatus::Active);
    assert!(created.start_date.is_some());

    let fetched = store.get_project(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let task = store.create_task(&new_task(created.id, "Write copy")).await.unwrap();
    let fetched = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Write copy");
    assert_eq!(fetched.project_id, created.id);
    assert_eq!(fetched.status, TaskStatus::Todo);
    assert_eq!(fetched.priority, TaskPriority::Medium);
}

async fn projects_list_newest_first(store: &dyn Store) {
    let first = store.create_project(&new_project("First")).await.unwrap();
    let second = store.create_project(&new_project("Second")).await.unwrap();

    let ids: Vec<DbId> = store
        .list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    let first_pos = ids.iter().position(|&id| id == first.id).unwrap();
    let second_pos = ids.iter().position(|&id| id == second.id).unwrap();
    assert!(second_pos < first_pos);
}

async fn patch_merges_and_clears(store: &dyn Store) {
    let project = store.create_project(&new_project("Patch me")).await.unwrap();
    let patch = ProjectPatch {
        status: Some(ProjectStatus::Completed),
        description: Some(None),
        ..ProjectPatch::default()
    };
    let updated = store.update_project(project.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "Patch me");
    assert_eq!(updated.status, ProjectStatus::Completed);
    assert_eq!(updated.description, None);
    assert_eq!(updated.created_at, project.created_at);

    let task = store.create_task(&new_task(project.id, "Card")).await.unwrap();
    let patch = TaskPatch {
        status: Some(TaskStatus::InProgress),
        ..TaskPatch::default()
    };
    let moved = store.update_task(task.id, &patch).await.unwrap().unwrap();
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert_eq!(moved.title, "Card");
}

async fn missing_rows_are_reported(store: &dyn Store) {
    assert!(store.get_project(999_999).await.unwrap().is_none());
    assert!(store
        .update_task(999_999, &TaskPatch::default())
        .await
        .unwrap()
        .is_none());
    assert!(!store.delete_task(999_999).await.unwrap());
    assert!(!store.delete_project(999_999).await.unwrap());
    assert_matches!(
        store.create_task(&new_task(999_999, "Orphan")).await,
        Err(StoreError::MissingReference { id: 999_999, .. })
    );
}

async fn unknown_users_are_missing_references(store: &dyn Store) {
    let mut owned = new_project("Owned");
    owned.owner_id = Some(888_888);
    assert_matches!(
        store.create_project(&owned).await,
        Err(StoreError::MissingReference { entity: "User", id: 888_888 })
    );

    let project = store.create_project(&new_project("Assigned")).await.unwrap();
    let mut assigned = new_task(project.id, "Nobody's");
    assigned.assignee_id = Some(888_888);
    assert_matches!(
        store.create_task(&assigned).await,
        Err(StoreError::MissingReference { entity: "User", id: 888_888 })
    );
    assert!(store.list_tasks(Some(project.id)).await.unwrap().is_empty());

    let task = store.create_task(&new_task(project.id, "Real")).await.unwrap();
    let patch = TaskPatch {
        assignee_id: Some(Some(888_888)),
        ..TaskPatch::default()
    };
    assert_matches!(
        store.update_task(task.id, &patch).await,
        Err(StoreError::MissingReference { entity: "User", id: 888_888 })
    );
    let stored = store.get_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.assignee_id, None);
}

async fn delete_cascades_tasks_but_keeps_history(store: &dyn Store) {
    let doomed = store.create_project(&new_project("Doomed")).await.unwrap();
    let kept = store.create_project(&new_project("Kept")).await.unwrap();
    store.create_task(&new_task(doomed.id, "a")).await.unwrap();
    store.create_task(&new_task(doomed.id, "b")).await.unwrap();
    let survivor = store.create_task(&new_task(kept.id, "c")).await.unwrap();
    store
        .append_activity(&NewActivity {
            user_id: None,
            project_id: Some(doomed.id),
            action: ActivityAction::CreatedProject,
            details: Some("Created project: Doomed".to_string()),
        })
        .await
        .unwrap();

    assert!(store.delete_project(doomed.id).await.unwrap());

    assert!(store.get_project(doomed.id).await.unwrap().is_none());
    assert!(store.list_tasks(Some(doomed.id)).await.unwrap().is_empty());
    let remaining = store.list_tasks(Some(kept.id)).await.unwrap();
    assert_eq!(remaining, vec![survivor]);

    let activity = store.list_recent_activity(20).await.unwrap();
    assert!(activity.iter().any(|a| a.log.project_id == Some(doomed.id)));
}

async fn tasks_scope_by_project_in_id_order(store: &dyn Store) {
    let a = store.create_project(&new_project("A")).await.unwrap();
    let b = store.create_project(&new_project("B")).await.unwrap();
    let t1 = store.create_task(&new_task(a.id, "1")).await.unwrap();
    let t2 = store.create_task(&new_task(b.id, "2")).await.unwrap();
    let t3 = store.create_task(&new_task(a.id, "3")).await.unwrap();

    let scoped: Vec<DbId> = store
        .list_tasks(Some(a.id))
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(scoped, vec![t1.id, t3.id]);

    let all: Vec<DbId> = store
        .list_tasks(None)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert!(all.contains(&t2.id));
    assert!(all.windows(2).all(|w| w[0] < w[1]));
}

async fn activity_is_newest_first_and_limited(store: &dyn Store) {
    let user = store.create_user(&new_user("actor")).await.unwrap();
    for i in 0..25 {
        store
            .append_activity(&NewActivity {
                user_id: Some(user.id),
                project_id: None,
                action: ActivityAction::CreatedTask,
                details: Some(format!("Created task: {i}")),
            })
            .await
            .unwrap();
    }
    store
        .append_activity(&NewActivity {
            user_id: Some(424_242),
            project_id: None,
            action: ActivityAction::UpdatedProject,
            details: None,
        })
        .await
        .unwrap();

    let recent = store.list_recent_activity(20).await.unwrap();
    assert_eq!(recent.len(), 20);
    assert!(recent.windows(2).all(|w| w[0].log.created_at >= w[1].log.created_at));

    // The newest entry points at a user that never existed.
    assert_eq!(recent[0].log.action, ActivityAction::UpdatedProject);
    assert!(recent[0].user.is_none());
    assert_eq!(recent[1].user.as_ref().map(|u| u.id), Some(user.id));
    assert_eq!(recent[1].log.details.as_deref(), Some("Created task: 24"));
}

async fn usernames_are_unique(store: &dyn Store) {
    let user = store.create_user(&new_user("unique")).await.unwrap();
    assert_matches!(
        store.create_user(&new_user("unique")).await,
        Err(StoreError::Conflict(_))
    );

    let creds = store.find_user_by_username("unique").await.unwrap().unwrap();
    assert_eq!(creds.user, user);
    assert_eq!(creds.password_hash, "not-a-real-hash");
    assert_eq!(store.find_user(user.id).await.unwrap(), Some(user));
    assert!(store.find_user_by_username("nobody").await.unwrap().is_none());
}

async fn run_all(store: &dyn Store) {
    store.ping().await.unwrap();
    create_then_get_round_trips(store).await;
    projects_list_newest_first(store).await;
    patch_merges_and_clears(store).await;
    missing_rows_are_reported(store).await;
    unknown_users_are_missing_references(store).await;
    delete_cascades_tasks_but_keeps_history(store).await;
    tasks_scope_by_project_in_id_order(store).await;
    usernames_are_unique(store).await;
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn memory_store_honours_contract() {
    run_all(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_store_activity_window() {
    activity_is_newest_first_and_limited(&MemoryStore::new()).await;
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn pg_store_honours_contract(pool: PgPool) {
    run_all(&PgStore::new(pool)).await;
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn pg_store_activity_window(pool: PgPool) {
    activity_is_newest_first_and_limited(&PgStore::new(pool)).await;
}
