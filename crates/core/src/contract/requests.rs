use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::errors::ValidationFailure;
use super::input::{present, IdInput, Nullable};
use crate::models::{Project, Task, User};
use crate::status::{ProjectStatus, TaskPriority, TaskStatus, UnknownVariant};
use crate::types::{DbId, Timestamp};

/// Default number of entries returned by `GET /activity`.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;

/// Upper bound for `?limit=` on `GET /activity`.
pub const MAX_ACTIVITY_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn rejected(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rejected("blank", "must not be empty".to_string()));
    }
    Ok(())
}

fn one_of<T: FromStr<Err = UnknownVariant>>(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|e| rejected("unknown_value", format!("must be one of: {}", e.expected)))
}

fn project_status(value: &str) -> Result<(), ValidationError> {
    one_of::<ProjectStatus>(value)
}

fn task_status(value: &str) -> Result<(), ValidationError> {
    one_of::<TaskStatus>(value)
}

fn task_priority(value: &str) -> Result<(), ValidationError> {
    one_of::<TaskPriority>(value)
}

fn positive_id(value: &IdInput) -> Result<(), ValidationError> {
    match value.resolve() {
        Some(_) => Ok(()),
        None => Err(rejected("invalid_id", "must be a positive integer".to_string())),
    }
}

/// Parse an already-validated enumerated field.
fn parse_field<T: FromStr<Err = UnknownVariant>>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<T>, ValidationFailure> {
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| ValidationFailure::single(field, e.to_string()))
}

fn resolve_id(field: &str, value: Option<&IdInput>) -> Result<Option<DbId>, ValidationFailure> {
    match value {
        None => Ok(None),
        Some(id) => id
            .resolve()
            .map(Some)
            .ok_or_else(|| ValidationFailure::single(field, "must be a positive integer")),
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, ValidationFailure> {
    value.ok_or_else(|| ValidationFailure::single(field, format!("{field} is required")))
}

fn collected(result: Result<(), validator::ValidationErrors>) -> ValidationFailure {
    result.err().map(ValidationFailure::from).unwrap_or_default()
}

/// A patch field that may be omitted but never cleared.
fn reject_null<T>(failure: &mut ValidationFailure, field: &str, value: &Nullable<T>) {
    if matches!(value, Some(None)) {
        failure.push(field, "must not be null");
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Body of `POST /projects`. Unknown fields are ignored; the owner is always
/// the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(required(message = "name is required"), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "project_status"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

/// Validated project creation. `owner_id` is filled in by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Option<DbId>,
    /// `None` means "the creation time".
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}

impl CreateProjectRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn into_new_project(self) -> Result<NewProject, ValidationFailure> {
        self.validate()?;
        let status = parse_field::<ProjectStatus>("status", self.status.as_deref())?;
        Ok(NewProject {
            name: required("name", self.name)?,
            description: self.description,
            status: status.unwrap_or_default(),
            owner_id: None,
            start_date: self.start_date,
            due_date: self.due_date,
        })
    }
}

/// Body of `PATCH /projects/{id}`. Only the listed fields are patchable.
///
/// Every field is read with `present` so that `null` is seen: it clears
/// `description` and `dueDate` and is rejected everywhere else.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[validate(custom(function = "project_status"))]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub start_date: Nullable<Timestamp>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Nullable<Timestamp>,
}

/// Validated partial update of a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Nullable<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Timestamp>,
    pub due_date: Nullable<Timestamp>,
}

impl UpdateProjectRequest {
    pub fn into_patch(self) -> Result<ProjectPatch, ValidationFailure> {
        let mut failure = collected(self.validate());
        reject_null(&mut failure, "name", &self.name);
        reject_null(&mut failure, "status", &self.status);
        reject_null(&mut failure, "startDate", &self.start_date);
        failure.into_result()?;

        Ok(ProjectPatch {
            status: parse_field("status", self.status.flatten().as_deref())?,
            name: self.name.flatten(),
            description: self.description,
            start_date: self.start_date.flatten(),
            due_date: self.due_date,
        })
    }
}

impl ProjectPatch {
    /// Merge the provided fields onto `project`.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(start_date) = self.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(due_date) = self.due_date {
            project.due_date = due_date;
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "projectId is required"),
        custom(function = "positive_id")
    )]
    pub project_id: Option<IdInput>,
    #[validate(required(message = "title is required"), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "task_status"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[validate(custom(function = "task_priority"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[validate(custom(function = "positive_id"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<IdInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

/// Validated task creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// `None` lets the service default the assignee to the caller.
    pub assignee_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
}

impl CreateTaskRequest {
    pub fn new(project_id: DbId, title: impl Into<String>) -> Self {
        Self {
            project_id: Some(IdInput::Number(project_id)),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn into_new_task(self) -> Result<NewTask, ValidationFailure> {
        self.validate()?;
        let project_id = resolve_id("projectId", self.project_id.as_ref())?;
        let assignee_id = resolve_id("assigneeId", self.assignee_id.as_ref())?;
        let status = parse_field::<TaskStatus>("status", self.status.as_deref())?;
        let priority = parse_field::<TaskPriority>("priority", self.priority.as_deref())?;
        Ok(NewTask {
            project_id: required("projectId", project_id)?,
            title: required("title", self.title)?,
            description: self.description,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            assignee_id,
            due_date: self.due_date,
        })
    }
}

/// Body of `PATCH /tasks/{id}`.
///
/// `projectId` is accepted only so that an attempt to change it is reported
/// against that field. As for projects, `null` clears the nullable fields
/// and is rejected on the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub project_id: Nullable<serde_json::Value>,
    #[validate(custom(function = "not_blank"))]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Nullable<String>,
    #[validate(custom(function = "task_status"))]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<String>>,
    #[validate(custom(function = "task_priority"))]
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub assignee_id: Nullable<IdInput>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Nullable<Timestamp>,
}

/// Validated partial update of a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Nullable<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Nullable<DbId>,
    pub due_date: Nullable<Timestamp>,
}

impl UpdateTaskRequest {
    /// A request that only moves the task to `status`.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(Some(status.as_str().to_string())),
            ..Self::default()
        }
    }

    pub fn into_patch(self) -> Result<TaskPatch, ValidationFailure> {
        let mut failure = collected(self.validate());
        if self.project_id.is_some() {
            failure.push("projectId", "cannot be changed after creation");
        }
        reject_null(&mut failure, "title", &self.title);
        reject_null(&mut failure, "status", &self.status);
        reject_null(&mut failure, "priority", &self.priority);
        let assignee_id = match &self.assignee_id {
            Some(Some(id)) => match resolve_id("assigneeId", Some(id)) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    failure.merge(e);
                    None
                }
            },
            Some(None) => Some(None),
            None => None,
        };
        failure.into_result()?;

        Ok(TaskPatch {
            status: parse_field("status", self.status.flatten().as_deref())?,
            priority: parse_field("priority", self.priority.flatten().as_deref())?,
            title: self.title.flatten(),
            description: self.description,
            assignee_id,
            due_date: self.due_date,
        })
    }
}

impl TaskPatch {
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Query string of `GET /tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListQuery {
    #[serde(rename = "projectId", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<IdInput>,
}

impl TaskListQuery {
    pub fn for_project(project_id: Option<DbId>) -> Self {
        Self {
            project_id: project_id.map(IdInput::Number),
        }
    }

    /// The project scope, if any, coerced to an id.
    pub fn project_scope(&self) -> Result<Option<DbId>, ValidationFailure> {
        resolve_id("projectId", self.project_id.as_ref())
    }
}

/// Query string of `GET /activity`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ActivityQuery {
    /// Requested limit clamped to `1..=MAX_ACTIVITY_LIMIT`.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}
