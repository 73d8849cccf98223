//! Outcomes of checking an item or account against the external platform.
//!
//! The HTTP client lives in the storefront; this module only classifies
//! responses and maps outcomes to what the visitor sees.

use serde::{Deserialize, Serialize};

use crate::notice::Notice;

/// Result of an existence check on the external platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The platform confirmed the resource exists.
    Verified,
    /// The platform says the resource does not exist.
    NotFound,
    /// The check could not be completed (timeout, network error, 5xx).
    Unknown,
}

impl VerificationOutcome {
    /// Classify a platform HTTP status.
    ///
    /// 2xx and 3xx verify, 404 and 410 are definite misses, everything else
    /// is inconclusive.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            200..=399 => Self::Verified,
            404 | 410 => Self::NotFound,
            _ => Self::Unknown,
        }
    }

    /// Whether the outcome is stable enough to cache.
    #[must_use]
    pub const fn is_definite(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Notice shown when an add-to-cart is refused. `None` when verified.
    #[must_use]
    pub fn refusal_notice(self) -> Option<Notice> {
        match self {
            Self::Verified => None,
            Self::NotFound => Some(Notice::verification_failed()),
            Self::Unknown => Some(Notice::verification_error()),
        }
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reject identifiers that cannot name a platform resource.
///
/// Game pass ids are decimal digits; usernames are 3-20 characters of ASCII
/// alphanumerics and underscores.
#[must_use]
pub fn is_valid_game_pass_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 20 && id.bytes().all(|b| b.is_ascii_digit())
}

#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
