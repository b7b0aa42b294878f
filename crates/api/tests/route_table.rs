//! The router serves every endpoint in the shared route table, so a path
//! the client builds from that table always reaches a handler.

mod common;

use axum::http::StatusCode;
use common::{
    app_with_user, create_project, create_task, delete_auth, get_auth, patch_json_auth,
    post_json_auth,
};
use serde_json::json;
use taskboard_core::contract::routes::{self, HttpMethod, API_PREFIX, PROJECT, TASK};

#[tokio::test]
async fn every_shared_endpoint_is_routed() {
    for endpoint in routes::ALL {
        let (app, _store, token) = app_with_user().await;
        let project_id = create_project(&app, &token, "Routed").await;
        let task_id = create_task(&app, &token, project_id, "Routed").await;

        let path = match endpoint.path {
            PROJECT => endpoint.path_for(project_id),
            TASK => endpoint.path_for(task_id),
            other => other.to_string(),
        };
        let uri = format!("{API_PREFIX}{path}");

        let response = match endpoint.method {
            HttpMethod::Get => get_auth(app, &uri, &token).await,
            HttpMethod::Post => post_json_auth(app, &uri, json!({}), &token).await,
            HttpMethod::Patch => patch_json_auth(app, &uri, json!({}), &token).await,
            HttpMethod::Delete => delete_auth(app, &uri, &token).await,
        };

        let status = response.status();
        assert_ne!(status, StatusCode::NOT_FOUND, "{} {uri}", endpoint.method.as_str());
        assert_ne!(
            status,
            StatusCode::METHOD_NOT_ALLOWED,
            "{} {uri}",
            endpoint.method.as_str()
        );
    }
}

#[tokio::test]
async fn paths_outside_the_table_are_not_routed() {
    let (app, _store, token) = app_with_user().await;
    let response = get_auth(app, &format!("{API_PREFIX}/tasks/1/comments"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
