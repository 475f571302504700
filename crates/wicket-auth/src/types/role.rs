//! Role domain types.
//!
//! Role codes are a closed, versioned enumeration. Authorization requests
//! carry free-form strings over the wire; parsing drops unknown codes so
//! they are never-satisfied rather than an error.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The closed set of role codes the authority recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCode {
    /// Platform administrator.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Content author.
    #[serde(rename = "AUTHOR")]
    Author,
    /// Content editor/reviewer.
    #[serde(rename = "EDITOR")]
    Editor,
    /// Default role assigned at sign-up.
    #[serde(rename = "LEARNER")]
    Learner,
}

impl RoleCode {
    /// All role codes, in a stable order.
    pub const ALL: [RoleCode; 4] = [
        RoleCode::Admin,
        RoleCode::Author,
        RoleCode::Editor,
        RoleCode::Learner,
    ];

    /// Returns the stable wire representation of this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Author => "AUTHOR",
            Self::Editor => "EDITOR",
            Self::Learner => "LEARNER",
        }
    }

    /// Parses a wire string into a role code.
    ///
    /// Comparison is case-sensitive. Returns `None` for unknown codes;
    /// callers treat those as never-satisfied.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "AUTHOR" => Some(Self::Author),
            "EDITOR" => Some(Self::Editor),
            "LEARNER" => Some(Self::Learner),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role record maintained by the authority.
///
/// Roles are referenced, never owned, by users; disabling a role here takes
/// effect at the next authorization check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique identifier for this role record.
    pub id: Uuid,

    /// The role code.
    pub code: RoleCode,

    /// Whether this role currently grants anything.
    pub enabled: bool,

    /// When this role record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Role {
    /// Creates a new enabled role with the given code.
    #[must_use]
    pub fn new(code: RoleCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        for code in RoleCode::ALL {
            assert_eq!(RoleCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(RoleCode::parse("admin"), None);
        assert_eq!(RoleCode::parse("Admin"), None);
    }

    #[test]
    fn test_parse_unknown_code() {
        assert_eq!(RoleCode::parse("SUPERUSER"), None);
        assert_eq!(RoleCode::parse(""), None);
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&RoleCode::Editor).unwrap();
        assert_eq!(json, "\"EDITOR\"");

        let code: RoleCode = serde_json::from_str("\"LEARNER\"").unwrap();
        assert_eq!(code, RoleCode::Learner);
    }
}
