#[cfg(feature = "otpauth")]
use url::ParseError;

use crate::SecretParseError;

/// Failures surfaced by generators and the code generator.
///
/// Variants fall in two groups: configuration errors, which prevent a
/// generator from being built at all, and invalid input, which the caller
/// can recover from by supplying a different counter or timestamp. A code
/// that simply does not match is never an error, it is a `false` outcome.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OtpError {
    /// The shared secret was empty.
    EmptySecret,
    /// The shared secret could not be decoded.
    Secret(SecretParseError),
    /// The requested code length is above [MAX_CODE_LENGTH](constant.MAX_CODE_LENGTH.html).
    InvalidCodeLength(usize),
    /// A negative counter reached the code generator.
    NegativeCounter(i64),
    /// A negative Unix timestamp was supplied to a time-based generator.
    NegativeTimestamp(i64),
    /// Advancing the counter would overflow.
    CounterOverflow,
}

impl OtpError {
    /// `true` for errors that prevent a generator from being constructed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OtpError::EmptySecret | OtpError::Secret(_) | OtpError::InvalidCodeLength(_)
        )
    }

    /// `true` for errors caused by an out-of-domain counter or timestamp.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OtpError::NegativeCounter(_)
                | OtpError::NegativeTimestamp(_)
                | OtpError::CounterOverflow
        )
    }
}

impl std::error::Error for OtpError {}

impl std::fmt::Display for OtpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpError::EmptySecret => write!(f, "A shared secret is required, got an empty one"),
            OtpError::Secret(e) => write!(f, "Invalid shared secret: {}", e),
            OtpError::InvalidCodeLength(code_length) => write!(
                f,
                "Code length must be at most {} digits, got {}",
                crate::MAX_CODE_LENGTH,
                code_length
            ),
            OtpError::NegativeCounter(counter) => write!(
                f,
                "Counter must not be negative, got {}",
                counter
            ),
            OtpError::NegativeTimestamp(timestamp) => write!(
                f,
                "Timestamp must not be negative, got {}",
                timestamp
            ),
            OtpError::CounterOverflow => write!(f, "Counter cannot be advanced any further"),
        }
    }
}

impl From<SecretParseError> for OtpError {
    fn from(e: SecretParseError) -> Self {
        OtpError::Secret(e)
    }
}

/// Ways an `otpauth://` provisioning URI can fail to parse.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OtpUrlError {
    #[cfg(feature = "otpauth")]
    Url(ParseError),
    Scheme(String),
    Host(String),
    Secret(String),
    Digits(String),
    Counter(String),
    MissingCounter,
    Period(String),
    LabelDecoding(String),
    IssuerDecoding(String),
    Otp(OtpError),
}

impl std::error::Error for OtpUrlError {}

impl std::fmt::Display for OtpUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpUrlError::Counter(counter) => write!(
                f,
                "Could not parse \"{}\" as a counter.",
                counter
            ),
            OtpUrlError::Digits(digits) => write!(
                f,
                "Could not parse \"{}\" as a number of digits.",
                digits
            ),
            OtpUrlError::Host(host) => write!(
                f,
                "Host should be hotp or totp, not \"{}\"",
                host
            ),
            OtpUrlError::IssuerDecoding(issuer) => write!(
                f,
                "Couldn't URL decode \"{}\"",
                issuer
            ),
            OtpUrlError::LabelDecoding(label) => write!(
                f,
                "Couldn't URL decode \"{}\"",
                label
            ),
            OtpUrlError::MissingCounter => write!(
                f,
                "A hotp URL must carry a counter parameter"
            ),
            OtpUrlError::Otp(e) => write!(f, "{}", e),
            OtpUrlError::Period(period) => write!(
                f,
                "Could not parse \"{}\" as a number.",
                period
            ),
            OtpUrlError::Scheme(scheme) => write!(
                f,
                "Scheme should be otpauth, not \"{}\"",
                scheme
            ),
            OtpUrlError::Secret(secret) => write!(
                f,
                "Secret \"{}\" is not a valid non-padded base32 string",
                secret
            ),
            #[cfg(feature = "otpauth")]
            OtpUrlError::Url(e) => write!(
                f,
                "Error parsing URL: {}",
                e
            ),
        }
    }
}

impl From<OtpError> for OtpUrlError {
    fn from(e: OtpError) -> Self {
        OtpUrlError::Otp(e)
    }
}

#[cfg(test)]
mod tests {
    use crate::{OtpError, OtpUrlError, SecretParseError};

    #[test]
    fn empty_secret() {
        let error = OtpError::EmptySecret;
        assert_eq!(
            error.to_string(),
            "A shared secret is required, got an empty one"
        );
        assert!(error.is_configuration());
        assert!(!error.is_invalid_input());
    }

    #[test]
    fn secret_parse() {
        let error: OtpError = SecretParseError::ParseBase32.into();
        assert_eq!(
            error.to_string(),
            "Invalid shared secret: Could not decode base32 secret."
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn invalid_code_length() {
        let error = OtpError::InvalidCodeLength(11);
        assert_eq!(
            error.to_string(),
            "Code length must be at most 10 digits, got 11"
        );
        assert!(error.is_configuration());
        assert!(!error.is_invalid_input());
    }

    #[test]
    fn negative_counter() {
        let error = OtpError::NegativeCounter(-3);
        assert_eq!(error.to_string(), "Counter must not be negative, got -3");
        assert!(error.is_invalid_input());
        assert!(!error.is_configuration());
    }

    #[test]
    fn negative_timestamp() {
        let error = OtpError::NegativeTimestamp(-1);
        assert_eq!(error.to_string(), "Timestamp must not be negative, got -1");
        assert!(error.is_invalid_input());
    }

    #[test]
    fn counter_overflow() {
        assert!(OtpError::CounterOverflow.is_invalid_input());
    }

    #[test]
    fn host() {
        let error = OtpUrlError::Host("steam".to_string());
        assert_eq!(
            error.to_string(),
            "Host should be hotp or totp, not \"steam\"".to_string()
        )
    }

    #[test]
    fn missing_counter() {
        let error = OtpUrlError::MissingCounter;
        assert_eq!(
            error.to_string(),
            "A hotp URL must carry a counter parameter".to_string()
        )
    }

    #[test]
    fn scheme() {
        let error = OtpUrlError::Scheme("https".to_string());
        assert_eq!(
            error.to_string(),
            "Scheme should be otpauth, not \"https\"".to_string()
        )
    }

    #[test]
    fn secret() {
        let error = OtpUrlError::Secret("YoLo".to_string());
        assert_eq!(
            error.to_string(),
            "Secret \"YoLo\" is not a valid non-padded base32 string".to_string()
        )
    }

    #[test]
    fn wraps_otp_error() {
        let error: OtpUrlError = OtpError::EmptySecret.into();
        assert_eq!(error, OtpUrlError::Otp(OtpError::EmptySecret));
        assert_eq!(
            error.to_string(),
            "A shared secret is required, got an empty one"
        );
    }

    #[test]
    #[cfg(feature = "otpauth")]
    fn url() {
        let error = OtpUrlError::Url(url::ParseError::EmptyHost);
        assert_eq!(
            error.to_string(),
            "Error parsing URL: empty host".to_string()
        )
    }
}
