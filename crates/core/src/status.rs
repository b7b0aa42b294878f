//! Closed enumerations stored as TEXT columns.
//!
//! Each variant's string value is what appears in the database and on the
//! wire. Parsing an unknown string is always an error; values are never
//! clamped to a default.

/// Error returned when a string is not one of an enum's known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'; expected one of: {expected}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Number of variants.
            pub const COUNT: usize = Self::ALL.len();

            /// The stored / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Position in [`Self::ALL`].
            pub fn ordinal(self) -> usize {
                self as usize
            }

            /// Comma-separated list of accepted values, for error messages.
            pub fn expected_values() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::status::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $val => Ok($name::$variant), )+
                    other => Err($crate::status::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        expected: Self::expected_values(),
                    }),
                }
            }
        }
    };
}

pub(crate) use define_text_enum;

define_text_enum! {
    /// Project lifecycle status.
    ProjectStatus ("project status") {
        Active = "active",
        Archived = "archived",
        Completed = "completed",
    }
}

define_text_enum! {
    /// Kanban column a task sits in.
    TaskStatus ("task status") {
        Todo = "todo",
        InProgress = "in_progress",
        Review = "review",
        Done = "done",
    }
}

define_text_enum! {
    /// Task priority.
    TaskPriority ("task priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_column_defaults() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn parse_known_values() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("archived".parse::<ProjectStatus>(), Ok(ProjectStatus::Archived));
        assert_eq!("high".parse::<TaskPriority>(), Ok(TaskPriority::High));
    }

    #[test]
    fn unknown_value_is_rejected_not_clamped() {
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.kind, "task priority");
        assert_eq!(err.value, "urgent");
        assert_eq!(err.expected, "low, medium, high");
        assert!("In_Progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: TaskStatus = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(back, TaskStatus::Review);
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        assert_eq!(TaskStatus::COUNT, 4);
        for (i, status) in TaskStatus::ALL.iter().enumerate() {
            assert_eq!(status.ordinal(), i);
        }
    }
}
