//! Representation of a shared secret, either "raw" bytes or a base32 encoded String
//!
//! Authenticator apps exchange secrets as unpadded RFC 4648 base32; generators
//! want the raw bytes. [`Secret`] converts between the two.
//!
//! # Examples
//!
//! ```
//! use otp_core::{Algorithm, Secret, TOTP};
//!
//! let secret = Secret::Encoded(String::from("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"));
//! let totp = TOTP::new(Algorithm::SHA1, 6, 30, secret.to_bytes().unwrap()).unwrap();
//!
//! assert_eq!(totp.generate_at(59).unwrap(), "287082");
//! ```

use base32::{self, Alphabet};

use constant_time_eq::constant_time_eq;

const ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Different ways secret parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParseError {
    /// Invalid base32 input.
    ParseBase32,
}

impl std::error::Error for SecretParseError {}

impl std::fmt::Display for SecretParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretParseError::ParseBase32 => write!(f, "Could not decode base32 secret."),
        }
    }
}

/// Shared secret between client and server to validate codes against/generate codes from.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret, without padding.
    Encoded(String),
}

impl PartialEq for Secret {
    /// Compares decoded bytes in constant time, so a Raw and an Encoded secret
    /// holding the same key are equal.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(a), Ok(b)) => constant_time_eq(&a, &b),
            (Err(_), Err(_)) => match (self, other) {
                (Secret::Encoded(a), Secret::Encoded(b)) => {
                    constant_time_eq(a.as_bytes(), b.as_bytes())
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl Secret {
    /// Get the inner value as a Vec of bytes, decoding base32 if needed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SecretParseError> {
        match self {
            Secret::Raw(s) => Ok(s.to_vec()),
            Secret::Encoded(s) => base32::decode(ALPHABET, s).ok_or(SecretParseError::ParseBase32),
        }
    }

    /// Try to transform a `Secret::Encoded` into a `Secret::Raw`
    pub fn to_raw(&self) -> Result<Self, SecretParseError> {
        match self {
            Secret::Raw(_) => Ok(self.clone()),
            Secret::Encoded(_) => self.to_bytes().map(Secret::Raw),
        }
    }

    /// Transform a `Secret::Raw` into a `Secret::Encoded`.
    pub fn to_encoded(&self) -> Self {
        match self {
            Secret::Raw(s) => Secret::Encoded(encode(s)),
            Secret::Encoded(_) => self.clone(),
        }
    }
}

/// Unpadded RFC 4648 base32, the form provisioning URIs carry.
pub(crate) fn encode(bytes: &[u8]) -> String {
    base32::encode(ALPHABET, bytes)
}

#[cfg(feature = "otpauth")]
pub(crate) fn decode(encoded: &str) -> Option<Vec<u8>> {
    base32::decode(ALPHABET, encoded)
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Raw(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Secret::Encoded(s) => write!(f, "{}", s),
        }
    }
}
