use tasktrail_core::{AppError, AppResult};

/// Declares a UUID-backed identifier newtype for one entity collection.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: uuid::Uuid) -> Self {
                Self(value)
            }

            /// Parses a transport value such as a path segment.
            pub fn parse(value: &str) -> tasktrail_core::AppResult<Self> {
                crate::ids::parse_uuid(value, $label).map(Self)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

pub(crate) use entity_id;

pub(crate) fn parse_uuid(value: &str, label: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value.trim())
        .map_err(|_| AppError::Validation(format!("Invalid {label} ID")))
}
