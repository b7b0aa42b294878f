//! HTTP client for the task board API.
//!
//! Wraps the `/api/v1` endpoints using [`reqwest`]. Request bodies are run
//! through the same conversion the server applies before anything is sent,
//! and every response is decoded into the shared model types. A body that
//! does not match its shape is an error, never a partially filled value.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskboard_core::contract::routes::{self, Endpoint, HttpMethod, API_PREFIX};
use taskboard_core::contract::{
    ActivityQuery, CreateProjectRequest, CreateTaskRequest, ErrorBody, LoginRequest,
    LoginResponse, TaskListQuery, UpdateProjectRequest, UpdateTaskRequest, ValidationFailure,
};
use taskboard_core::models::{ActivityWithActor, Project, ProjectWithTasks, Task, User};
use taskboard_core::types::DbId;
use validator::Validate;

use crate::error::ClientError;

/// HTTP client for one task board server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for a server.
    ///
    /// * `base_url` - Server root without the API prefix, e.g. `http://host:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token to every subsequent request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ---- auth ----

    /// Log in and keep the returned token for later requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        body.validate().map_err(ValidationFailure::from)?;

        let response: LoginResponse = self.send_json(routes::LOGIN, None, &body).await?;
        self.token = Some(response.access_token);
        Ok(response.user)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.fetch(routes::CURRENT_USER, None).await
    }

    /// Tell the server and forget the token.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let response = self.request(routes::LOGOUT, None).send().await?;
        Self::ensure_success(response).await?;
        self.token = None;
        Ok(())
    }

    // ---- projects ----

    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.fetch(routes::LIST_PROJECTS, None).await
    }

    /// The project together with its tasks.
    pub async fn get_project(&self, id: DbId) -> Result<ProjectWithTasks, ClientError> {
        self.fetch(routes::GET_PROJECT, Some(id)).await
    }

    pub async fn create_project(&self, input: &CreateProjectRequest) -> Result<Project, ClientError> {
        input.clone().into_new_project()?;
        self.send_json(routes::CREATE_PROJECT, None, input).await
    }

    pub async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProjectRequest,
    ) -> Result<Project, ClientError> {
        input.clone().into_patch()?;
        self.send_json(routes::UPDATE_PROJECT, Some(id), input).await
    }

    pub async fn delete_project(&self, id: DbId) -> Result<(), ClientError> {
        self.remove(routes::DELETE_PROJECT, id).await
    }

    // ---- tasks ----

    /// Tasks of one project, or every task when `project_id` is `None`.
    pub async fn list_tasks(&self, project_id: Option<DbId>) -> Result<Vec<Task>, ClientError> {
        let query = TaskListQuery::for_project(project_id);
        let response = self
            .request(routes::LIST_TASKS, None)
            .query(&query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn create_task(&self, input: &CreateTaskRequest) -> Result<Task, ClientError> {
        input.clone().into_new_task()?;
        self.send_json(routes::CREATE_TASK, None, input).await
    }

    pub async fn update_task(&self, id: DbId, input: &UpdateTaskRequest) -> Result<Task, ClientError> {
        input.clone().into_patch()?;
        self.send_json(routes::UPDATE_TASK, Some(id), input).await
    }

    pub async fn delete_task(&self, id: DbId) -> Result<(), ClientError> {
        self.remove(routes::DELETE_TASK, id).await
    }

    // ---- activity ----

    pub async fn list_activity(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityWithActor>, ClientError> {
        let response = self
            .request(routes::LIST_ACTIVITY, None)
            .query(&ActivityQuery { limit })
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, endpoint: Endpoint, id: Option<DbId>) -> String {
        let path = match id {
            Some(id) => endpoint.path_for(id),
            None => endpoint.path.to_string(),
        };
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, endpoint: Endpoint, id: Option<DbId>) -> reqwest::RequestBuilder {
        let method = match endpoint.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let builder = self.client.request(method, self.url(endpoint, id));
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<DbId>,
    ) -> Result<T, ClientError> {
        let response = self.request(endpoint, id).send().await?;
        Self::parse_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<DbId>,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.request(endpoint, id).json(body).send().await?;
        Self::parse_response(response).await
    }

    async fn remove(&self, endpoint: Endpoint, id: DbId) -> Result<(), ClientError> {
        let response = self.request(endpoint, Some(id)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Return the response unchanged on success, or decode the error body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let status = status.as_u16();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => {
                tracing::debug!(status, code = %body.code, error = %body.error, "API rejected request");
                Err(ClientError::Api { status, body })
            }
            Err(_) => Err(ClientError::Unexpected { status, body: text }),
        }
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
