//! Internal implementation of the RxPad identifier types.

use crate::{IdError, IdResult};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical user identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed to be canonical, so
/// storage paths derived from it are deterministic across the codebase.
///
/// # Construction
/// - [`UserUuid::new`] generates a fresh canonical UUID.
/// - [`UserUuid::parse`] validates an externally supplied identifier (for
///   example the `x-user-id` request header) without normalising other
///   common UUID forms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserUuid(Uuid);

impl Default for UserUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl UserUuid {
    /// Generates a new canonical user UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a UUID string that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not 32 lowercase hex
    /// characters.
    pub fn parse(input: &str) -> IdResult<Self> {
        if Self::is_canonical(input) {
            // SAFETY: is_canonical guarantees valid hex, so parse_str will succeed
            let uuid = Uuid::parse_str(input).expect("is_canonical guarantees valid UUID");
            return Ok(Self(uuid));
        }
        Err(IdError::InvalidInput(format!(
            "user id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes of lowercase hex.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns `parent_dir/<s1>/<s2>/<uuid>/` where `s1`/`s2` are the first
    /// four hex characters of this UUID.
    ///
    /// This is the template store's sharding scheme; it prevents very large
    /// fan-out in a single directory.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for UserUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for UserUuid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserUuid::parse(s)
    }
}

/// Client-side component identifier.
///
/// Format:
/// `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`
///
/// Example:
/// `20260806T143522.045Z-550e8400e29b41d4a716446655440000`
///
/// The identifier is allocated when a component is dropped onto the canvas
/// and is stable for the component's lifetime in the template. It is:
/// - Globally unique (the UUID suffix)
/// - Ordered by drop sequence (the timestamp prefix)
///
/// # Monotonicity
///
/// [`ComponentId::generate`] accepts the previously allocated id and bumps
/// the timestamp by at least 1 ms when the clock has not advanced, so rapid
/// successive drops in the same millisecond still produce strictly
/// increasing timestamps. Uniqueness never depends on this (the UUID
/// suffix alone guarantees it) but ordered ids make the drop sequence
/// visible in stored payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId {
    timestamp: DateTime<Utc>,
    suffix: Uuid,
}

impl ComponentId {
    /// Returns the timestamp component of this id.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Generate a new component id.
    ///
    /// If `last_id` is provided, the timestamp is guaranteed to be strictly
    /// greater than the last one (by at least 1 ms).
    pub fn generate(last_id: Option<&ComponentId>) -> Self {
        let now = Utc::now();

        let timestamp = match last_id {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            suffix: Uuid::new_v4(),
        }
    }
}

impl FromStr for ComponentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s
            .split_once('-')
            .ok_or_else(|| IdError::InvalidInput(format!("Invalid component id format: '{}'", s)))?;

        if !ts_str.ends_with('Z') {
            return Err(IdError::InvalidInput(format!(
                "Component id timestamp must end with 'Z': '{}'",
                ts_str
            )));
        }

        let ts_no_z = &ts_str[..ts_str.len() - 1];
        let naive =
            chrono::NaiveDateTime::parse_from_str(ts_no_z, "%Y%m%dT%H%M%S%.3f").map_err(|e| {
                IdError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
            })?;

        let timestamp = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);

        if !UserUuid::is_canonical(uuid_str) {
            return Err(IdError::InvalidInput(format!(
                "component id suffix must be 32 lowercase hex characters, got: '{}'",
                uuid_str
            )));
        }
        let suffix = Uuid::parse_str(uuid_str).expect("is_canonical guarantees valid UUID");

        Ok(Self { timestamp, suffix })
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.timestamp.format("%Y%m%dT%H%M%S%.3fZ"),
            self.suffix.simple()
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ComponentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ComponentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ComponentId::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UserUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UserUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UserUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}
