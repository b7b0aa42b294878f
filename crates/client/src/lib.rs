//! Typed consumer of the task board API.
//!
//! - [`api`] -- one method per endpoint, validating requests with the same
//!   rules the server applies.
//! - [`cache`] -- list results keyed by operation and scope.
//! - [`board`] -- Kanban columns with optimistic status moves.
//! - [`stats`] -- dashboard summary figures.

pub mod api;
pub mod board;
pub mod cache;
pub mod error;
pub mod stats;

pub use api::ApiClient;
pub use board::{Board, DragOutcome, DropTarget, PendingMove};
pub use cache::{QueryCache, QueryKey};
pub use error::ClientError;
pub use stats::{BoardStats, ProjectProgress};
