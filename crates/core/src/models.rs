//! Entity shapes as they appear on the wire.
//!
//! Field names are camelCase in JSON. The same structs are produced by the
//! store, serialized by the server, and decoded by the client, so a response
//! that does not match these shapes fails to decode on the consumer side.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityAction;
use crate::status::{ProjectStatus, TaskPriority, TaskStatus};
use crate::types::{DbId, Timestamp};

/// Public user representation. Credential material never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Option<DbId>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// An append-only audit entry.
///
/// `user_id` and `project_id` are weak references: the rows they point to
/// may have been deleted since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub action: ActivityAction,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

/// `GET /projects/{id}` response: the project plus its tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithTasks {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// `GET /activity` item: the entry joined with its actor, if still present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityWithActor {
    #[serde(flatten)]
    pub log: ActivityLog,
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: 1,
            project_id: 2,
            title: "Write copy".into(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            assignee_id: Some(5),
            due_date: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["projectId"], 2);
        assert_eq!(value["assigneeId"], 5);
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["priority"], "high");
        assert!(value.get("project_id").is_none());
    }

    #[test]
    fn activity_with_missing_actor_decodes() {
        let value = json!({
            "id": 10,
            "userId": 99,
            "projectId": 4,
            "action": "created_project",
            "details": "Created project: Launch",
            "createdAt": "2026-01-01T00:00:00Z",
            "user": null,
        });
        let entry: ActivityWithActor = serde_json::from_value(value).unwrap();
        assert_eq!(entry.log.action, ActivityAction::CreatedProject);
        assert_eq!(entry.log.user_id, Some(99));
        assert!(entry.user.is_none());
    }

    #[test]
    fn unknown_status_in_response_fails_to_decode() {
        let value = json!({
            "id": 1,
            "projectId": 2,
            "title": "x",
            "description": null,
            "status": "blocked",
            "priority": "low",
            "assigneeId": null,
            "dueDate": null,
            "createdAt": "2026-01-01T00:00:00Z",
        });
        assert!(serde_json::from_value::<Task>(value).is_err());
    }
}
