use serde::{Deserialize, Serialize};

/// Primary key of a row in `users`.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    postgres_types::ToSql,
    postgres_types::FromSql,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
#[postgres(transparent)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for UserId {
    type Err = core::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for UserId {
    fn from(v: i64) -> Self {
        UserId(v)
    }
}

impl From<UserId> for i64 {
    fn from(v: UserId) -> i64 {
        v.0
    }
}
