//! Bearer token issuance and verification.

pub mod codec;

pub use codec::{TokenClaims, TokenCodec, TokenError, TokenKind};
