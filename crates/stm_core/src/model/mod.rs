//! Domain model for projects, their members and their geo-referenced tasks.
//!
//! # Responsibility
//! - Define the value types shared by registry, event bus and project view.
//! - Validate per-value invariants at construction and deserialization time.
//!
//! # Invariants
//! - Values are never mutated in place from outside; updates produce new values.
//! - A project's owner is implicitly a member.
//! - A task has at most one assignee and `process_points <= max_process_points`.

/// Declares an opaque, string-backed identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns whether the identifier is blank after trimming.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

// Declared after `string_id!` so the submodules can expand it.
pub mod project;
pub mod task;
pub mod user;
