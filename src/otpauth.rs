//! Provisioning URIs in the [Key Uri Format](https://github.com/google/google-authenticator/wiki/Key-Uri-Format)
//! understood by authenticator apps, usually handed over as a QR code.
//!
//! ```
//! use otp_core::{Algorithm, KeyUri, OtpKind, HOTP};
//!
//! let hotp = HOTP::new(Algorithm::SHA1, 4, b"Hello!".to_vec(), 12, 0).unwrap();
//! let url = hotp.get_url("TEST:alice@google.com", "Example");
//! assert_eq!(url, "otpauth://hotp/TEST:alice@google.com?secret=JBSWY3DPEE&issuer=Example&algorithm=SHA1&digits=4&counter=12");
//!
//! let key = KeyUri::parse(&url).unwrap();
//! assert_eq!(key.kind, OtpKind::Hotp { counter: 12 });
//! assert_eq!(key.issuer.as_deref(), Some("Example"));
//! ```

use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::{
    Algorithm, Clock, OtpError, OtpParameters, OtpUrlError, DEFAULT_STEP, HOTP, MAX_CODE_LENGTH,
    TOTP,
};

/// Characters kept as-is in a URL path segment: the unreserved ones plus `$ & + : = @`
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

fn escape(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

impl<T: AsRef<[u8]>> HOTP<T> {
    /// Will generate a standard URL used to automatically add HOTP credentials, carrying the current counter
    ///
    /// Label and issuer will be URL-encoded as path segments
    /// Secret will be base 32'd without padding, as per RFC.
    pub fn get_url(&self, label: &str, issuer: &str) -> String {
        let parameters = self.parameters();
        format!(
            "otpauth://hotp/{}?secret={}&issuer={}&algorithm={}&digits={}&counter={}",
            escape(label),
            parameters.get_secret_base32(),
            escape(issuer),
            parameters.algorithm(),
            parameters.code_length(),
            self.counter(),
        )
    }
}

impl HOTP {
    /// Generate a HOTP from a `otpauth://hotp/` URL, with the given synchronization window
    pub fn from_url<S: AsRef<str>>(url: S, sync_window: u32) -> Result<HOTP, OtpUrlError> {
        KeyUri::parse(url.as_ref())?.into_hotp(sync_window)
    }
}

impl<T: AsRef<[u8]>, C: Clock> TOTP<T, C> {
    /// Will generate a standard URL used to automatically add TOTP credentials
    ///
    /// Apps assume 30 seconds steps, so `period` is only emitted for other step lengths.
    pub fn get_url(&self, label: &str, issuer: &str) -> String {
        let parameters = self.parameters();
        let mut url = format!(
            "otpauth://totp/{}?secret={}&issuer={}&algorithm={}&digits={}",
            escape(label),
            parameters.get_secret_base32(),
            escape(issuer),
            parameters.algorithm(),
            parameters.code_length(),
        );
        if self.step() != DEFAULT_STEP {
            url.push_str(&format!("&period={}", self.step()));
        }
        url
    }
}

impl TOTP {
    /// Generate a TOTP from a `otpauth://totp/` URL
    pub fn from_url<S: AsRef<str>>(url: S) -> Result<TOTP, OtpUrlError> {
        KeyUri::parse(url.as_ref())?.into_totp()
    }
}

/// Which generator a provisioning URI describes
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OtpKind {
    Hotp { counter: i64 },
    Totp { step: u64 },
}

/// Content of a parsed provisioning URI
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyUri {
    pub kind: OtpKind,
    /// Decoded label, kept whole: an `issuer:` prefix is not split off
    pub label: String,
    pub issuer: Option<String>,
    pub algorithm: Algorithm,
    /// As found in the URI, 0 when absent
    pub code_length: usize,
    /// Non-encoded secret
    pub secret: Vec<u8>,
}

impl KeyUri {
    /// Parse an `otpauth://hotp/…` or `otpauth://totp/…` URI
    ///
    /// Unknown algorithm names resolve to SHA1 and unknown parameters are ignored.
    /// A missing `period` means 30 seconds, a missing `digits` means 6. `digits` above
    /// [MAX_CODE_LENGTH](constant.MAX_CODE_LENGTH.html) are rejected.
    pub fn parse(uri: &str) -> Result<KeyUri, OtpUrlError> {
        let url = Url::parse(uri).map_err(OtpUrlError::Url)?;
        if url.scheme() != "otpauth" {
            return Err(OtpUrlError::Scheme(url.scheme().to_string()));
        }
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if host != "hotp" && host != "totp" {
            return Err(OtpUrlError::Host(host));
        }

        let path = url.path().trim_start_matches('/');
        let label = urlencoding::decode(path)
            .map_err(|_| OtpUrlError::LabelDecoding(path.to_string()))?
            .into_owned();

        let mut algorithm = Algorithm::SHA1;
        let mut code_length = 0;
        let mut counter = None;
        let mut step = DEFAULT_STEP;
        let mut secret = Vec::new();
        let mut issuer = None;

        // values are path-escaped, so '+' is literal and must not go through form decoding
        for pair in url.query().unwrap_or_default().split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "algorithm" => algorithm = Algorithm::from_name(value),
                "digits" => {
                    code_length = value
                        .parse::<usize>()
                        .ok()
                        .filter(|digits| *digits <= MAX_CODE_LENGTH)
                        .ok_or_else(|| OtpUrlError::Digits(value.to_string()))?;
                }
                "counter" => {
                    counter = Some(
                        value
                            .parse::<i64>()
                            .map_err(|_| OtpUrlError::Counter(value.to_string()))?,
                    );
                }
                "period" => {
                    step = value
                        .parse::<u64>()
                        .map_err(|_| OtpUrlError::Period(value.to_string()))?;
                }
                "secret" => {
                    secret = crate::secret::decode(value)
                        .ok_or_else(|| OtpUrlError::Secret(value.to_string()))?;
                }
                "issuer" => {
                    issuer = Some(
                        urlencoding::decode(value)
                            .map_err(|_| OtpUrlError::IssuerDecoding(value.to_string()))?
                            .into_owned(),
                    );
                }
                _ => {}
            }
        }

        if secret.is_empty() {
            return Err(OtpUrlError::Secret("".to_string()));
        }

        let kind = if host == "hotp" {
            OtpKind::Hotp {
                counter: counter.ok_or(OtpUrlError::MissingCounter)?,
            }
        } else {
            OtpKind::Totp { step }
        };

        Ok(KeyUri {
            kind,
            label,
            issuer,
            algorithm,
            code_length,
            secret,
        })
    }

    fn into_parameters(self) -> Result<OtpParameters, OtpError> {
        OtpParameters::new(self.algorithm, self.code_length, self.secret)
    }

    /// Build the described HOTP, with the given synchronization window
    pub fn into_hotp(self, sync_window: u32) -> Result<HOTP, OtpUrlError> {
        let kind = self.kind;
        match kind {
            OtpKind::Hotp { counter } => Ok(HOTP::from_parameters(
                self.into_parameters()?,
                counter,
                sync_window,
            )),
            OtpKind::Totp { .. } => Err(OtpUrlError::Host("totp".to_string())),
        }
    }

    /// Build the described TOTP
    pub fn into_totp(self) -> Result<TOTP, OtpUrlError> {
        let kind = self.kind;
        match kind {
            OtpKind::Totp { step } => Ok(TOTP::from_parameters(self.into_parameters()?, step)),
            OtpKind::Hotp { .. } => Err(OtpUrlError::Host("hotp".to_string())),
        }
    }
}

impl FromStr for KeyUri {
    type Err = OtpUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyUri::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotp_url() {
        let hotp = HOTP::new(Algorithm::SHA1, 4, b"Hello!".to_vec(), 12, 0).unwrap();
        assert_eq!(
            hotp.get_url("TEST:alice@google.com", "Example"),
            "otpauth://hotp/TEST:alice@google.com?secret=JBSWY3DPEE&issuer=Example&algorithm=SHA1&digits=4&counter=12"
        );
    }

    #[test]
    fn hotp_url_follows_counter() {
        let mut hotp = HOTP::new(Algorithm::SHA256, 6, b"Hello!".to_vec(), 0, 0).unwrap();
        hotp.generate().unwrap();
        assert!(hotp
            .get_url("alice", "Example")
            .ends_with("&algorithm=SHA256&digits=6&counter=1"));
    }

    #[test]
    fn totp_url() {
        let totp = TOTP::new(Algorithm::SHA512, 8, 30, "TestSecretSuperSecret").unwrap();
        assert_eq!(
            totp.get_url("constantoine@github.com", "Github"),
            "otpauth://totp/constantoine@github.com?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ&issuer=Github&algorithm=SHA512&digits=8"
        );
    }

    #[test]
    fn totp_url_custom_period() {
        let totp = TOTP::new(Algorithm::SHA1, 6, 60, "TestSecretSuperSecret").unwrap();
        assert!(totp.get_url("a", "b").ends_with("&digits=6&period=60"));
    }

    #[test]
    fn url_escapes_as_path_segment() {
        let totp = TOTP::new(Algorithm::SHA1, 6, 30, "TestSecretSuperSecret").unwrap();
        let url = totp.get_url("Jane Doe/work?x", "ACME, Inc.");
        assert!(url.starts_with("otpauth://totp/Jane%20Doe%2Fwork%3Fx?"));
        assert!(url.contains("&issuer=ACME%2C%20Inc.&"));
        let url = totp.get_url("a+b=c$d&e", "é");
        assert!(url.starts_with("otpauth://totp/a+b=c$d&e?"));
        assert!(url.contains("&issuer=%C3%A9&"));
    }

    #[test]
    fn parse_hotp() {
        let key: KeyUri = "otpauth://hotp/TEST:alice@google.com?secret=JBSWY3DPEE&issuer=Example&algorithm=SHA1&digits=4&counter=12"
            .parse()
            .unwrap();
        assert_eq!(key.kind, OtpKind::Hotp { counter: 12 });
        assert_eq!(key.label, "TEST:alice@google.com");
        assert_eq!(key.issuer.as_deref(), Some("Example"));
        assert_eq!(key.algorithm, Algorithm::SHA1);
        assert_eq!(key.code_length, 4);
        assert_eq!(key.secret, b"Hello!");
    }

    #[test]
    fn parse_totp_defaults() {
        let key =
            KeyUri::parse("otpauth://totp/GitHub:test?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ")
                .unwrap();
        assert_eq!(key.kind, OtpKind::Totp { step: 30 });
        assert_eq!(key.issuer, None);
        let totp = key.into_totp().unwrap();
        assert_eq!(totp.parameters().algorithm(), Algorithm::SHA1);
        assert_eq!(totp.parameters().code_length(), 6);
        assert_eq!(totp.step(), 30);
        assert_eq!(totp.parameters().secret(), b"TestSecretSuperSecret");
    }

    #[test]
    fn parse_totp_query() {
        let totp = TOTP::from_url(
            "otpauth://totp/GitHub:test?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ&digits=8&period=60&algorithm=SHA256&foo=bar",
        )
        .unwrap();
        assert_eq!(totp.parameters().algorithm(), Algorithm::SHA256);
        assert_eq!(totp.parameters().code_length(), 8);
        assert_eq!(totp.step(), 60);
    }

    #[test]
    fn parse_unknown_algorithm_falls_back() {
        let totp = TOTP::from_url(
            "otpauth://totp/test?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ&algorithm=MD5",
        )
        .unwrap();
        assert_eq!(totp.parameters().algorithm(), Algorithm::SHA1);
    }

    #[test]
    fn parse_escaped_values() {
        let key = KeyUri::parse(
            "otpauth://totp/Jane%20Doe%2Fwork?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ&issuer=A+B%2C%20Inc.",
        )
        .unwrap();
        assert_eq!(key.label, "Jane Doe/work");
        assert_eq!(key.issuer.as_deref(), Some("A+B, Inc."));
    }

    #[test]
    fn hotp_round_trip() {
        let hotp =
            HOTP::new(Algorithm::SHA512, 8, b"12345678901234567890".to_vec(), 42, 0).unwrap();
        let url = hotp.get_url("alice@example.com", "Example Co");
        let parsed = HOTP::from_url(&url, 0).unwrap();
        assert_eq!(parsed, hotp);
    }

    #[test]
    fn totp_round_trip() {
        let totp = TOTP::new(Algorithm::SHA256, 7, 45, b"12345678901234567890".to_vec()).unwrap();
        let parsed = TOTP::from_url(totp.get_url("bob", "Example")).unwrap();
        assert_eq!(parsed, totp);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            KeyUri::parse("not a url"),
            Err(OtpUrlError::Url(_))
        ));
        assert!(matches!(
            KeyUri::parse("https://totp/test?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ"),
            Err(OtpUrlError::Scheme(_))
        ));
        assert!(matches!(
            KeyUri::parse("otpauth://steam/test?secret=KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ"),
            Err(OtpUrlError::Host(_))
        ));
        assert_eq!(
            KeyUri::parse("otpauth://totp/test"),
            Err(OtpUrlError::Secret("".to_string()))
        );
        assert!(matches!(
            KeyUri::parse("otpauth://totp/test?secret=1!"),
            Err(OtpUrlError::Secret(_))
        ));
        assert!(matches!(
            KeyUri::parse("otpauth://totp/test?secret=JBSWY3DPEE&digits=six"),
            Err(OtpUrlError::Digits(_))
        ));
        assert!(matches!(
            KeyUri::parse("otpauth://totp/test?secret=JBSWY3DPEE&period=-30"),
            Err(OtpUrlError::Period(_))
        ));
        assert_eq!(
            KeyUri::parse("otpauth://hotp/test?secret=JBSWY3DPEE"),
            Err(OtpUrlError::MissingCounter)
        );
        assert!(matches!(
            KeyUri::parse("otpauth://hotp/test?secret=JBSWY3DPEE&counter=x"),
            Err(OtpUrlError::Counter(_))
        ));
    }

    #[test]
    fn parse_rejects_oversized_digits() {
        for digits in ["11", "1000000000", "18446744073709551615", "18446744073709551616"] {
            let uri = format!("otpauth://totp/x?secret=JBSWY3DPEE&digits={}", digits);
            assert_eq!(
                KeyUri::parse(&uri),
                Err(OtpUrlError::Digits(digits.to_string()))
            );
            assert_eq!(
                TOTP::from_url(&uri),
                Err(OtpUrlError::Digits(digits.to_string()))
            );
        }
        let totp = TOTP::from_url("otpauth://totp/x?secret=JBSWY3DPEE&digits=10").unwrap();
        assert_eq!(totp.generate_at(59).unwrap().len(), 10);
    }

    #[test]
    fn oversized_code_length_rejected_when_building() {
        let mut key = KeyUri::parse("otpauth://hotp/x?secret=JBSWY3DPEE&counter=0").unwrap();
        key.code_length = usize::MAX;
        assert_eq!(
            key.into_hotp(0),
            Err(OtpUrlError::Otp(OtpError::InvalidCodeLength(usize::MAX)))
        );
    }

    #[test]
    fn kind_mismatch() {
        let key = KeyUri::parse("otpauth://totp/test?secret=JBSWY3DPEE").unwrap();
        assert!(matches!(key.into_hotp(0), Err(OtpUrlError::Host(_))));
        assert!(matches!(
            TOTP::from_url("otpauth://hotp/test?secret=JBSWY3DPEE&counter=1"),
            Err(OtpUrlError::Host(_))
        ));
    }
}
