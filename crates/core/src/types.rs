/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity names used in `NotFound` errors and log fields.
pub mod entity {
    pub const PROJECT: &str = "Project";
    pub const TASK: &str = "Task";
    pub const USER: &str = "User";
}
