//! This library generates and validates one-time passcodes for two-factor authentication: counter-driven codes per [rfc-4226](https://tools.ietf.org/html/rfc4226) (HOTP) and time-driven codes per [rfc-6238](https://tools.ietf.org/html/rfc6238) (TOTP). Both share one dynamic truncation routine, so codes interoperate with any compliant authenticator app.
//!
//! Callers own the shared secret and, for HOTP, the persisted counter. A [HOTP](struct.HOTP.html) mutates its counter on every successful call and must be accessed exclusively (`&mut`, or behind one lock per credential). A [TOTP](struct.TOTP.html) holds no mutable state and can be shared freely.
//!
//! Be aware that some authenticator apps will accept the `SHA256`
//! and `SHA512` algorithms but silently fallback to `SHA1`, which
//! makes validation fail due to mismatched algorithms.
//!
//! # Examples
//!
//! ```rust
//! use otp_core::{Algorithm, HOTP};
//!
//! let mut hotp = HOTP::new(Algorithm::SHA1, 6, b"12345678901234567890".to_vec(), 0, 2).unwrap();
//! assert_eq!(hotp.generate().unwrap(), "755224");
//! assert_eq!(hotp.counter(), 1);
//!
//! // the client is one code ahead, the sync window covers it
//! assert!(hotp.validate("359152").unwrap());
//! assert_eq!(hotp.counter(), 3);
//! ```
//!
//! ```rust
//! use otp_core::{Algorithm, TOTP};
//!
//! let totp = TOTP::new(Algorithm::SHA256, 4, 30, "TEST").unwrap();
//! assert_eq!(totp.generate_at(1706984502).unwrap(), "0133");
//! assert!(totp.validate_at(1706984502, "0133").unwrap());
//! ```

mod clock;
mod config;
mod error;
mod hotp;
#[cfg(feature = "otpauth")]
mod otpauth;
mod secret;
mod totp;

pub use clock::{Clock, SystemClock};
pub use config::{HotpConfig, TotpConfig};
pub use error::{OtpError, OtpUrlError};
pub use hotp::HOTP;
#[cfg(feature = "otpauth")]
pub use otpauth::{KeyUri, OtpKind};
pub use secret::{Secret, SecretParseError};
pub use totp::{DEFAULT_STEP, TOTP};

use constant_time_eq::constant_time_eq;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use core::fmt;
use std::convert::Infallible;
use std::str::FromStr;

use hmac::Mac;

type HmacSha1 = hmac::Hmac<sha1::Sha1>;
type HmacSha256 = hmac::Hmac<sha2::Sha256>;
type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Code length used when none (or zero) is configured, per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3).
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code accepted. The truncated value is a 31-bit integer, so an 11th digit would always be a padding zero.
pub const MAX_CODE_LENGTH: usize = 10;

/// Algorithm enum holds the three standards algorithms for HOTP/TOTP as per the [reference implementation](https://tools.ietf.org/html/rfc6238#appendix-A)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(from = "String", into = "String"))]
pub enum Algorithm {
    #[default]
    SHA1,
    SHA256,
    SHA512,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SHA1 => f.write_str("SHA1"),
            Algorithm::SHA256 => f.write_str("SHA256"),
            Algorithm::SHA512 => f.write_str("SHA512"),
        }
    }
}

impl Algorithm {
    /// Resolve an algorithm from its name.
    ///
    /// Matching ignores case and dashes, so `sha-256` is `SHA256`. Any name
    /// that is not recognized resolves to `SHA1` rather than failing; a
    /// warning is logged when that happens.
    pub fn from_name(name: &str) -> Algorithm {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "SHA1" => Algorithm::SHA1,
            "SHA256" => Algorithm::SHA256,
            "SHA512" => Algorithm::SHA512,
            _ => {
                log::warn!("unknown hash algorithm {:?}, falling back to SHA1", name);
                Algorithm::SHA1
            }
        }
    }

    fn hash<D>(mut digest: D, data: &[u8]) -> Vec<u8>
    where
        D: Mac,
    {
        digest.update(data);
        digest.finalize().into_bytes().to_vec()
    }

    /// Keyed MAC of `data` under `key`.
    pub fn sign(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        const ANY_KEY: &str = "HMAC can take a key of any size";
        match self {
            Algorithm::SHA1 => Algorithm::hash(HmacSha1::new_from_slice(key).expect(ANY_KEY), data),
            Algorithm::SHA256 => {
                Algorithm::hash(HmacSha256::new_from_slice(key).expect(ANY_KEY), data)
            }
            Algorithm::SHA512 => {
                Algorithm::hash(HmacSha512::new_from_slice(key).expect(ANY_KEY), data)
            }
        }
    }
}

impl From<&str> for Algorithm {
    fn from(name: &str) -> Self {
        Algorithm::from_name(name)
    }
}

impl From<String> for Algorithm {
    fn from(name: String) -> Self {
        Algorithm::from_name(&name)
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.to_string()
    }
}

impl FromStr for Algorithm {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Algorithm::from_name(s))
    }
}

/// Everything needed to turn a counter into a code: the shared secret, the hash algorithm and the number of digits.
///
/// Immutable once built. The secret is sensitive data, treat it accordingly.
#[derive(Debug, Clone)]
pub struct OtpParameters<T = Vec<u8>> {
    algorithm: Algorithm,
    code_length: usize,
    secret: T,
}

impl<T: AsRef<[u8]>> PartialEq for OtpParameters<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.algorithm != other.algorithm {
            return false;
        }
        if self.code_length != other.code_length {
            return false;
        }
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl<T: AsRef<[u8]>> OtpParameters<T> {
    /// Bundle the parameters shared by both generator kinds.
    ///
    /// * `code_length`: `0` selects [DEFAULT_CODE_LENGTH](constant.DEFAULT_CODE_LENGTH.html)
    ///
    /// # Errors
    ///
    /// Will return [OtpError::EmptySecret](enum.OtpError.html#variant.EmptySecret) if `secret` is empty,
    /// and [OtpError::InvalidCodeLength](enum.OtpError.html#variant.InvalidCodeLength) if `code_length`
    /// is above [MAX_CODE_LENGTH](constant.MAX_CODE_LENGTH.html)
    pub fn new(algorithm: Algorithm, code_length: usize, secret: T) -> Result<Self, OtpError> {
        if secret.as_ref().is_empty() {
            return Err(OtpError::EmptySecret);
        }
        assert_code_length(code_length)?;
        let code_length = if code_length == 0 {
            DEFAULT_CODE_LENGTH
        } else {
            code_length
        };
        Ok(OtpParameters {
            algorithm,
            code_length,
            secret,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn secret(&self) -> &T {
        &self.secret
    }

    /// Will return the base32 representation of the secret, which might be useful when users want to manually add the secret to their authenticator
    pub fn get_secret_base32(&self) -> String {
        secret::encode(self.secret.as_ref())
    }

    /// MAC of the 8-byte big-endian encoding of `counter`
    pub fn sign(&self, counter: i64) -> Result<Vec<u8>, OtpError> {
        let counter = u64::try_from(counter).map_err(|_| OtpError::NegativeCounter(counter))?;
        Ok(self
            .algorithm
            .sign(self.secret.as_ref(), counter.to_be_bytes().as_ref()))
    }

    /// Will generate the code for the given counter value
    ///
    /// The result is always exactly [code_length](#method.code_length) decimal digits, left-padded with zeros.
    ///
    /// # Errors
    ///
    /// Will return [OtpError::NegativeCounter](enum.OtpError.html#variant.NegativeCounter) for a negative `counter`
    pub fn generate(&self, counter: i64) -> Result<String, OtpError> {
        let digest = self.sign(counter)?;
        Ok(format!(
            "{1:00$}",
            self.code_length,
            truncate(&digest, self.code_length)
        ))
    }

    /// Compares `candidate` with the code for `counter` in constant time.
    /// Malformed candidates simply don't match.
    pub(crate) fn matches(&self, counter: i64, candidate: &str) -> Result<bool, OtpError> {
        let expected = self.generate(counter)?;
        Ok(constant_time_eq(expected.as_bytes(), candidate.as_bytes()))
    }
}

fn assert_code_length(code_length: usize) -> Result<(), OtpError> {
    if code_length > MAX_CODE_LENGTH {
        Err(OtpError::InvalidCodeLength(code_length))
    } else {
        Ok(())
    }
}

/// Dynamic truncation, [rfc-4226 section 5.3](https://tools.ietf.org/html/rfc4226#section-5.3)
fn truncate(digest: &[u8], code_length: usize) -> u32 {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    // top bit masked off to stay clear of signed/unsigned ambiguity
    let value = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    // a 31-bit value is already below 10^10
    match u32::try_from(code_length)
        .ok()
        .and_then(|digits| 10_u32.checked_pow(digits))
    {
        Some(modulus) => value % modulus,
        None => value,
    }
}
