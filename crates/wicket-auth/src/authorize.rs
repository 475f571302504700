//! Role-based authorization.
//!
//! Access is granted if the user holds at least one of the requested role
//! codes among their enabled roles. An empty requirement means
//! "authenticated is sufficient" and always succeeds. Checks run against
//! the user's current role set, so role revocation takes effect without
//! waiting for token expiry.

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::{RoleCode, User};

/// Checks whether a user satisfies a role requirement.
///
/// # Errors
///
/// `Forbidden` if `required` is non-empty and the user's enabled roles do
/// not intersect it. Distinct from `Unauthenticated`: the caller has already
/// proven who the user is.
pub fn authorize(user: &User, required: &[RoleCode]) -> AuthResult<()> {
    if required.is_empty() {
        return Ok(());
    }

    if required.iter().any(|code| user.has_role(*code)) {
        return Ok(());
    }

    Err(AuthError::forbidden(format!(
        "requires one of: {}",
        required
            .iter()
            .map(RoleCode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

/// Parses wire role strings into codes, dropping unknown values.
///
/// Unknown codes are never-satisfied rather than an error, so a request
/// naming only unknown roles yields an empty parse — callers that require
/// roles must treat that as a non-empty, unsatisfiable requirement.
#[must_use]
pub fn parse_role_codes(values: &[String]) -> Vec<RoleCode> {
    values
        .iter()
        .filter_map(|v| RoleCode::parse(v))
        .collect()
}

/// Checks a wire-form role requirement (as received over the bus).
///
/// Differs from [`authorize`] in that the requirement arrives as raw
/// strings: a non-empty requirement that parses to nothing is `Forbidden`,
/// not a free pass.
///
/// # Errors
///
/// `Forbidden` under the same policy as [`authorize`].
pub fn authorize_codes(user: &User, required: &[String]) -> AuthResult<()> {
    if required.is_empty() {
        return Ok(());
    }

    let parsed = parse_role_codes(required);
    if parsed.is_empty() {
        return Err(AuthError::forbidden(format!(
            "requires one of: {}",
            required.join(", ")
        )));
    }
    authorize(user, &parsed)
}
