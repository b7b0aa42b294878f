//! Client against a real server bound to a local port, backed by the
//! in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use taskboard_api::auth::jwt::JwtConfig;
use taskboard_api::auth::password::hash_password;
use taskboard_api::config::{ServerConfig, StorageBackend};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_client::{
    ApiClient, Board, BoardStats, ClientError, DragOutcome, DropTarget, QueryCache, QueryKey,
};
use taskboard_core::contract::{CreateProjectRequest, CreateTaskRequest, UpdateProjectRequest};
use taskboard_core::status::TaskStatus;
use taskboard_db::seed::{seed_demo_data, DEMO_PASSWORD, DEMO_USERNAME};
use taskboard_db::{MemoryStore, Store};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        database_url: None,
        seed_demo_data: true,
        jwt: JwtConfig {
            secret: "client-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Start a seeded server and return its base URL plus a handle on its store.
async fn spawn_server() -> (String, MemoryStore) {
    let store = MemoryStore::new();
    let hash = hash_password(DEMO_PASSWORD).unwrap();
    seed_demo_data(&store, &hash).await.unwrap();

    let config = config();
    let state = AppState::new(Arc::new(store.clone()), config.clone());
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), store)
}

async fn signed_in_client() -> (ApiClient, MemoryStore) {
    let (base_url, store) = spawn_server().await;
    let mut api = ApiClient::new(base_url);
    api.login(DEMO_USERNAME, DEMO_PASSWORD).await.unwrap();
    (api, store)
}

// ---------------------------------------------------------------------------
// Test: auth round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_current_user_and_logout() {
    let (base_url, _store) = spawn_server().await;
    let mut api = ApiClient::new(base_url);

    let err = api.login(DEMO_USERNAME, "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Invalid username or password");

    let user = api.login(DEMO_USERNAME, DEMO_PASSWORD).await.unwrap();
    assert_eq!(user.username, DEMO_USERNAME);
    assert_eq!(api.current_user().await.unwrap().id, user.id);

    api.logout().await.unwrap();
    assert!(!api.is_authenticated());
    assert_matches!(
        api.current_user().await,
        Err(ClientError::Api { status: 401, .. })
    );
}

// ---------------------------------------------------------------------------
// Test: local validation runs before any request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_input_is_rejected_locally() {
    let (api, store) = signed_in_client().await;
    let before = store.list_tasks(None).await.unwrap().len();

    let mut request = CreateTaskRequest::new(1, "Rush");
    request.priority = Some("urgent".to_string());
    let err = api.create_task(&request).await.unwrap_err();

    assert_matches!(err, ClientError::Invalid(f) if f.has_field("priority"));
    assert_eq!(store.list_tasks(None).await.unwrap().len(), before);
}

#[tokio::test]
async fn server_side_rejections_decode_the_error_body() {
    let (api, _store) = signed_in_client().await;

    let err = api
        .update_project(999, &UpdateProjectRequest::default())
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Api { status: 404, ref body } if body.code == "NOT_FOUND");

    let err = api
        .create_task(&CreateTaskRequest::new(999, "Orphan"))
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Api { status: 400, ref body }
        if body.fields.iter().any(|f| f.field == "projectId"));
}

// ---------------------------------------------------------------------------
// Test: the Kanban flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drag_to_new_column_sends_one_update_and_invalidates() {
    let (api, store) = signed_in_client().await;
    let project = api
        .create_project(&CreateProjectRequest::named("Launch"))
        .await
        .unwrap();
    let task = api
        .create_task(&CreateTaskRequest::new(project.id, "Write copy"))
        .await
        .unwrap();
    let activity_before = store.list_recent_activity(20).await.unwrap().len();

    let mut cache = QueryCache::new();
    let tasks = cache.load_tasks(&api, Some(project.id)).await.unwrap();
    cache.load_project(&api, project.id).await.unwrap();
    cache.load_tasks(&api, None).await.unwrap();
    let mut board = Board::new(project.id, tasks);

    let DragOutcome::Move(pending) = board
        .drag_end(task.id, Some(DropTarget::Column(TaskStatus::Done)))
        .unwrap()
    else {
        panic!("expected a cross-column move");
    };
    assert_eq!(board.column(TaskStatus::Done)[0].id, task.id);

    let confirmed = board.commit_move(&api, &mut cache, pending).await.unwrap();
    assert_eq!(confirmed.status, TaskStatus::Done);
    assert_eq!(board.column(TaskStatus::Done), &[confirmed]);

    assert!(!cache.contains(QueryKey::Tasks(Some(project.id))));
    assert!(!cache.contains(QueryKey::Tasks(None)));
    assert!(!cache.contains(QueryKey::Project(project.id)));

    let activity = api.list_activity(None).await.unwrap();
    assert_eq!(activity.len(), activity_before + 1);
    assert_eq!(
        activity[0].log.details.as_deref(),
        Some("Moved task 'Write copy' to done")
    );
}

#[tokio::test]
async fn reorder_within_column_sends_nothing() {
    let (api, store) = signed_in_client().await;
    let project = api
        .create_project(&CreateProjectRequest::named("Quiet"))
        .await
        .unwrap();
    let a = api
        .create_task(&CreateTaskRequest::new(project.id, "a"))
        .await
        .unwrap();
    let b = api
        .create_task(&CreateTaskRequest::new(project.id, "b"))
        .await
        .unwrap();
    let activity_before = store.list_recent_activity(20).await.unwrap().len();

    let mut board = Board::new(project.id, api.list_tasks(Some(project.id)).await.unwrap());
    let outcome = board.drag_end(a.id, Some(DropTarget::Card(b.id))).unwrap();

    assert_matches!(outcome, DragOutcome::Reorder { status: TaskStatus::Todo, .. });
    assert_eq!(
        store.list_recent_activity(20).await.unwrap().len(),
        activity_before
    );
}

#[tokio::test]
async fn failed_move_reverts_and_reconverges() {
    let (api, _store) = signed_in_client().await;
    let project = api
        .create_project(&CreateProjectRequest::named("Flaky"))
        .await
        .unwrap();
    let kept = api
        .create_task(&CreateTaskRequest::new(project.id, "kept"))
        .await
        .unwrap();
    let gone = api
        .create_task(&CreateTaskRequest::new(project.id, "gone"))
        .await
        .unwrap();

    let mut cache = QueryCache::new();
    let tasks = cache.load_tasks(&api, Some(project.id)).await.unwrap();
    let mut board = Board::new(project.id, tasks);

    // Someone else deletes the card while it is on our board.
    api.delete_task(gone.id).await.unwrap();

    let DragOutcome::Move(pending) = board
        .drag_end(gone.id, Some(DropTarget::Column(TaskStatus::Review)))
        .unwrap()
    else {
        panic!("expected a cross-column move");
    };
    let err = board.commit_move(&api, &mut cache, pending).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(board.column(TaskStatus::Review).is_empty());
    assert!(board.task(gone.id).is_none());
    assert_eq!(board.column(TaskStatus::Todo), &[kept]);
    // The refetch repopulated the project's task list.
    assert!(cache.contains(QueryKey::Tasks(Some(project.id))));
}

// ---------------------------------------------------------------------------
// Test: dashboard figures from the seeded data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_dashboard_stats() {
    let (api, _store) = signed_in_client().await;
    let mut cache = QueryCache::new();

    let projects = cache.load_projects(&api).await.unwrap();
    let tasks = cache.load_tasks(&api, None).await.unwrap();
    let stats = BoardStats::compute(&projects, &tasks);

    assert_eq!(stats.active_projects, 1);
    assert_eq!(stats.progress.len(), 1);
    assert_eq!(stats.progress[0].total, tasks.len());
    assert_eq!(stats.completed_tasks + stats.pending_tasks, tasks.len());

    let activity = cache.load_activity(&api).await.unwrap();
    assert!(activity
        .iter()
        .any(|a| a.log.action.as_str() == "system_init"));
}
