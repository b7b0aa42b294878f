//! Request/response contract shared by the server and the client.
//!
//! Request DTOs accept loosely typed transport input (ids as numbers or
//! numeric strings, enumerated values as plain strings) and are converted
//! into typed commands only after every field passes validation. Both sides
//! of the wire run the same conversion, so a value rejected here never
//! reaches persistence or client state.

mod errors;
mod input;
mod requests;
pub mod routes;

pub use errors::{codes, ErrorBody, FieldError, ValidationFailure};
pub use input::{IdInput, Nullable};
pub use requests::{
    ActivityQuery, CreateProjectRequest, CreateTaskRequest, LoginRequest, LoginResponse,
    NewProject, NewTask, ProjectPatch, TaskListQuery, TaskPatch, UpdateProjectRequest,
    UpdateTaskRequest, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT,
};
