//! The caller identity as seen by the mutation layer.
//!
//! How a request proves who it is (tokens, sessions) is decided at the
//! transport edge; the core only needs to know whether there is a user and
//! which one.

use crate::error::CoreError;
use crate::types::DbId;

/// Who is making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User(DbId),
}

impl Principal {
    /// Return the acting user id, or `Unauthorized` for anonymous callers.
    pub fn require_user(&self) -> Result<DbId, CoreError> {
        match self {
            Principal::User(id) => Ok(*id),
            Principal::Anonymous => Err(CoreError::Unauthorized(
                "Authentication required".into(),
            )),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn anonymous_is_rejected() {
        assert_matches!(
            Principal::Anonymous.require_user(),
            Err(CoreError::Unauthorized(_))
        );
        assert!(!Principal::Anonymous.is_authenticated());
    }

    #[test]
    fn user_yields_id() {
        assert_eq!(Principal::User(7).require_user().unwrap(), 7);
        assert!(Principal::User(7).is_authenticated());
    }
}
