//! Route table shared by the router and the client.
//!
//! Paths are relative to [`API_PREFIX`] and use `{id}` placeholders, which is
//! also the axum path syntax.

use crate::types::DbId;

/// Prefix every resource route is nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Liveness check, mounted at the root rather than under [`API_PREFIX`].
pub const HEALTH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One operation: method plus path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
}

impl Endpoint {
    const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self { method, path }
    }

    /// The path with `{id}` replaced, without the API prefix.
    pub fn path_for(&self, id: DbId) -> String {
        build_path(self.path, id)
    }
}

pub const PROJECTS: &str = "/projects";
pub const PROJECT: &str = "/projects/{id}";
pub const TASKS: &str = "/tasks";
pub const TASK: &str = "/tasks/{id}";
pub const ACTIVITY: &str = "/activity";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_USER: &str = "/auth/user";
pub const AUTH_LOGOUT: &str = "/auth/logout";

pub const LIST_PROJECTS: Endpoint = Endpoint::new(HttpMethod::Get, PROJECTS);
pub const GET_PROJECT: Endpoint = Endpoint::new(HttpMethod::Get, PROJECT);
pub const CREATE_PROJECT: Endpoint = Endpoint::new(HttpMethod::Post, PROJECTS);
pub const UPDATE_PROJECT: Endpoint = Endpoint::new(HttpMethod::Patch, PROJECT);
pub const DELETE_PROJECT: Endpoint = Endpoint::new(HttpMethod::Delete, PROJECT);
pub const LIST_TASKS: Endpoint = Endpoint::new(HttpMethod::Get, TASKS);
pub const CREATE_TASK: Endpoint = Endpoint::new(HttpMethod::Post, TASKS);
pub const UPDATE_TASK: Endpoint = Endpoint::new(HttpMethod::Patch, TASK);
pub const DELETE_TASK: Endpoint = Endpoint::new(HttpMethod::Delete, TASK);
pub const LIST_ACTIVITY: Endpoint = Endpoint::new(HttpMethod::Get, ACTIVITY);
pub const LOGIN: Endpoint = Endpoint::new(HttpMethod::Post, AUTH_LOGIN);
pub const CURRENT_USER: Endpoint = Endpoint::new(HttpMethod::Get, AUTH_USER);
pub const LOGOUT: Endpoint = Endpoint::new(HttpMethod::Post, AUTH_LOGOUT);

/// Every endpoint, for documentation and route coverage tests.
pub const ALL: &[Endpoint] = &[
    LIST_PROJECTS,
    GET_PROJECT,
    CREATE_PROJECT,
    UPDATE_PROJECT,
    DELETE_PROJECT,
    LIST_TASKS,
    CREATE_TASK,
    UPDATE_TASK,
    DELETE_TASK,
    LIST_ACTIVITY,
    LOGIN,
    CURRENT_USER,
    LOGOUT,
];

/// Substitute `id` into a path template.
pub fn build_path(template: &str, id: DbId) -> String {
    template.replace("{id}", &id.to_string())
}
