//! Signed bearer token codec.
//!
//! Issues and verifies compact, stateless tokens carrying the subject and
//! session identifiers. HS256 with a process-wide signing secret; no I/O.
//!
//! Verification failures are distinguishable: callers must be able to tell
//! an expired token (which may trigger a refresh flow) from a tampered one
//! (which must not).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::AuthConfig;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during token encoding and verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token could not be parsed at all.
    #[error("Malformed token: {message}")]
    Malformed {
        /// Description of the parse failure.
        message: String,
    },

    /// The token parsed but its signature does not verify.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token is structurally valid but past its expiry.
    #[error("Token expired")]
    Expired,

    /// The token verified but carries unacceptable claims.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why the claims are invalid.
        message: String,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding failure.
        message: String,
    },
}

impl TokenError {
    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClaims` error.
    #[must_use]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Returns `true` if this failure is expiry, as opposed to tampering or
    /// garbage input.
    #[must_use]
    pub fn is_expiry(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => Self::invalid_claims(err.to_string()),
            _ => Self::malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Discriminator between the two token flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing individual requests.
    Access,
    /// Long-lived, single-use credential for minting a new pair.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer.
    pub iss: String,
    /// Subject: the owning user's id.
    pub sub: Uuid,
    /// Session id this token is bound to.
    pub sid: Uuid,
    /// Unique token id. Guarantees two tokens never share bytes even when
    /// issued for the same session within the same second.
    pub jti: Uuid,
    /// Access-vs-refresh discriminator.
    pub typ: TokenKind,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

// ============================================================================
// Codec
// ============================================================================

/// Issues and verifies bearer tokens.
///
/// Pure function of the signing secret and the token bytes; safe to share
/// across tasks.
pub struct TokenCodec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: time::Duration,
    refresh_lifetime: time::Duration,
}

impl TokenCodec {
    /// Creates a codec from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            access_lifetime: time::Duration::seconds(
                config.access_token_lifetime.as_secs() as i64
            ),
            refresh_lifetime: time::Duration::seconds(
                config.refresh_token_lifetime.as_secs() as i64
            ),
        }
    }

    /// Issues a signed token for the given subject and session.
    ///
    /// The embedded expiry is the configured lifetime for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if serialization fails.
    pub fn issue(&self, subject: Uuid, session: Uuid, kind: TokenKind) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let lifetime = match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        };

        let claims = TokenClaims {
            iss: self.issuer.clone(),
            sub: subject,
            sid: session,
            jti: Uuid::new_v4(),
            typ: kind,
            iat: now.unix_timestamp(),
            exp: (now + lifetime).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            TokenError::Encoding {
                message: e.to_string(),
            }
        })
    }

    /// Verifies a token's signature, issuer, and expiry.
    ///
    /// # Errors
    ///
    /// - `Malformed` for unparseable input
    /// - `InvalidSignature` for tampering or a foreign signing key
    /// - `Expired` for a structurally valid token past its expiry
    /// - `InvalidClaims` for a wrong issuer
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation(true))?;
        Ok(data.claims)
    }

    /// Verifies signature and issuer but accepts an expired token.
    ///
    /// Used only by the refresh flow, where the just-expired access token
    /// still identifies the session being rotated. Tampering is rejected
    /// exactly as in [`TokenCodec::verify`].
    ///
    /// # Errors
    ///
    /// Same as [`TokenCodec::verify`] minus `Expired`.
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation(false))?;
        Ok(data.claims)
    }

    fn validation(&self, validate_exp: bool) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = validate_exp;
        validation.leeway = 0;
        validation
    }
}
