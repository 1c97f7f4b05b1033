//! Strongly-typed identifiers used across the domain.
//!
//! All entities are keyed by database-assigned integers, so the newtypes wrap
//! `i64` and serialize transparently.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a post.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

/// Identifier of a user (post author).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

/// Identifier of a category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }

            /// Parse the integer at the start of `s`, ignoring whatever follows.
            ///
            /// Leading whitespace and one sign are accepted, so `" 7"`, `"7.5"`
            /// and `"7-my-slug"` all give 7. Fails when no digit comes first or
            /// the value does not fit in an `i64`.
            pub fn parse_leading(s: &str) -> Result<Self, DomainError> {
                let s = s.trim_start();
                let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
                let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
                if digits == 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: no leading digits in {:?}",
                        $name, s
                    )));
                }
                let end = s.len() - unsigned.len() + digits;
                Self::from_str(&s[..end])
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = i64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(PostId, "PostId");
impl_int_newtype!(UserId, "UserId");
impl_int_newtype!(CategoryId, "CategoryId");
