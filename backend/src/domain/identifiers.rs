//! Server-generated UUID identifiers for every persisted entity.
//!
//! Identifiers are minted with [`Uuid::new_v4`] when a row is created and are
//! never reused. Replace-by-recreate updates mint a fresh identifier, so an
//! identifier names one immutable version of a row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error returned when parsing an identifier from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct InvalidIdentifier {
    kind: &'static str,
}

impl InvalidIdentifier {
    /// Label of the identifier that failed to parse, e.g. `review id`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its canonical text form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, InvalidIdentifier> {
                let raw = id.as_ref();
                if raw.trim() != raw {
                    return Err(InvalidIdentifier { kind: $label });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| InvalidIdentifier { kind: $label })
            }

            /// Mint a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidIdentifier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_identifier!(
    /// Stable user identifier.
    UserId,
    "user id"
);
define_identifier!(
    /// Catalogue item identifier.
    ItemId,
    "item id"
);
define_identifier!(
    /// Identifier of one version of a review.
    ReviewId,
    "review id"
);
define_identifier!(
    /// Identifier of one version of a comment.
    CommentId,
    "comment id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    fn parses_canonical_uuid() {
        let id = ReviewId::new(VALID_ID).expect("valid uuid");
        assert_eq!(id.to_string(), VALID_ID);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_input(#[case] raw: &str) {
        let err = UserId::new(raw).expect_err("malformed ids are rejected");
        assert_eq!(err.kind(), "user id");
        assert_eq!(err.to_string(), "user id must be a valid UUID");
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(CommentId::random(), CommentId::random());
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = ItemId::new(VALID_ID).expect("valid uuid");
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::json!(VALID_ID));
    }
}
