//! Strongly-typed identifiers for care entities
//!
//! Every entity is keyed by a numeric surrogate assigned by the database.
//! Wrapping the raw `i64` prevents a `ClientId` being passed where a
//! `HouseId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::query::Value;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an existing surrogate key
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying surrogate key
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl From<$name> for Value {
            fn from(id: $name) -> Value {
                Value::Int(id.0)
            }
        }
    };
}

define_id!(HouseId, "HSE");
define_id!(ClientId, "CLI");
define_id!(UserId, "USR");
define_id!(IncidentId, "INC");
define_id!(NoteId, "NTE");
define_id!(DocumentId, "DOC");
define_id!(ContactId, "CNT");
define_id!(NdisPlanId, "PLN");
define_id!(NoticeId, "NTC");
define_id!(MealRecordId, "MEAL");
