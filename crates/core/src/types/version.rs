//! The state generation counter.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generation counter for the shared queue+spot state.
///
/// Every committed mutation of the shared state advances the counter by
/// exactly one, so the sequence of versions totally orders all writers.
/// Clients receive the current version as an opaque entity tag and hand it
/// back as a write precondition; the wire form is the plain decimal integer
/// (`Display`/`FromStr`).
///
/// ## Examples
///
/// ```
/// use chargeboard_core::StateVersion;
///
/// let v: StateVersion = "7".parse().unwrap();
/// assert_eq!(v, StateVersion::new(7));
/// assert_eq!(v.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateVersion(i64);

impl StateVersion {
    /// Create a version from its raw counter value.
    #[must_use]
    pub const fn new(version: i64) -> Self {
        Self(version)
    }

    /// Get the underlying counter value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for StateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StateVersion {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for StateVersion {
    fn from(version: i64) -> Self {
        Self(version)
    }
}

impl From<StateVersion> for i64 {
    fn from(version: StateVersion) -> Self {
        version.0
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for StateVersion {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for StateVersion {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
        let version = <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self(version))
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for StateVersion {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let v = StateVersion::new(123);
        let parsed: StateVersion = v.to_string().parse().expect("parse own display output");
        assert_eq!(parsed, v);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!("".parse::<StateVersion>().is_err());
        assert!("abc".parse::<StateVersion>().is_err());
        assert!("1.5".parse::<StateVersion>().is_err());
    }

    #[test]
    fn test_ordering_follows_counter() {
        assert!(StateVersion::new(1) < StateVersion::new(2));
    }
}
