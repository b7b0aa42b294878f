use serde::{Deserialize, Deserializer, Serialize};

use crate::types::DbId;

/// An identifier as it arrives from transport: a JSON number, or a string
/// such as a form value or query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    /// Coerce to a positive id. `None` if the text is not a positive integer.
    pub fn resolve(&self) -> Option<DbId> {
        let id = match self {
            IdInput::Number(n) => *n,
            IdInput::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (id > 0).then_some(id)
    }
}

impl From<DbId> for IdInput {
    fn from(id: DbId) -> Self {
        IdInput::Number(id)
    }
}

/// A patch field that can be left alone (`None`), cleared
/// (`Some(None)`, sent as JSON `null`), or set (`Some(Some(v))`).
pub type Nullable<T> = Option<Option<T>>;

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
