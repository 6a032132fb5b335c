use crate::{Algorithm, OtpError, OtpParameters, Secret, HOTP, TOTP};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Set of options to create a [HOTP](struct.HOTP.html), also usable to persist one
///
/// Zero values mean "use the default", so a partially filled config (for instance a
/// deserialized one missing fields) still builds a sensible generator.
///
/// # Example
/// ```
/// use otp_core::{Algorithm, HotpConfig, HOTP};
///
/// let mut config = HotpConfig::new(b"12345678901234567890".to_vec()).unwrap();
/// config.sync_window(5).counter(3).algorithm(Algorithm::SHA1);
///
/// let hotp = HOTP::from_config(config).unwrap();
/// assert_eq!(hotp.counter(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct HotpConfig {
    /// Non-encoded shared secret
    secret: Vec<u8>,
    /// 0 selects the default of 6
    #[cfg_attr(feature = "serde_support", serde(default))]
    code_length: usize,
    #[cfg_attr(feature = "serde_support", serde(default))]
    algorithm: Algorithm,
    #[cfg_attr(feature = "serde_support", serde(default))]
    counter: i64,
    #[cfg_attr(feature = "serde_support", serde(default))]
    sync_window: u32,
}

impl HotpConfig {
    /// Create a config with a 6 digits code, SHA1, a counter at 0 and no synchronization window
    ///
    /// # Errors
    ///
    /// Will return an error if `secret` is empty
    pub fn new(secret: Vec<u8>) -> Result<HotpConfig, OtpError> {
        if secret.is_empty() {
            return Err(OtpError::EmptySecret);
        }
        Ok(HotpConfig {
            secret,
            code_length: crate::DEFAULT_CODE_LENGTH,
            algorithm: Algorithm::SHA1,
            counter: 0,
            sync_window: 0,
        })
    }

    /// Same as [new](#method.new), decoding the secret first
    pub fn from_secret(secret: &Secret) -> Result<HotpConfig, OtpError> {
        HotpConfig::new(secret.to_bytes()?)
    }

    pub(crate) fn from_hotp<T: AsRef<[u8]>>(hotp: &HOTP<T>) -> HotpConfig {
        let parameters = hotp.parameters();
        HotpConfig {
            secret: parameters.secret().as_ref().to_vec(),
            code_length: parameters.code_length(),
            algorithm: parameters.algorithm(),
            counter: hotp.counter(),
            sync_window: hotp.sync_window(),
        }
    }

    /// Set the `code_length`
    pub fn code_length(&mut self, value: usize) -> &mut Self {
        self.code_length = value;
        self
    }

    /// Set the `algorithm`
    pub fn algorithm(&mut self, value: Algorithm) -> &mut Self {
        self.algorithm = value;
        self
    }

    /// Set the `counter`
    pub fn counter(&mut self, value: i64) -> &mut Self {
        self.counter = value;
        self
    }

    /// Set the `sync_window`
    pub fn sync_window(&mut self, value: u32) -> &mut Self {
        self.sync_window = value;
        self
    }
}

impl TryFrom<HotpConfig> for HOTP {
    type Error = OtpError;

    /// Try to create a [HOTP](struct.HOTP.html) from a [HotpConfig](struct.HotpConfig.html)
    fn try_from(config: HotpConfig) -> Result<Self, Self::Error> {
        let parameters = OtpParameters::new(config.algorithm, config.code_length, config.secret)?;
        Ok(HOTP::from_parameters(
            parameters,
            config.counter,
            config.sync_window,
        ))
    }
}

/// Set of options to create a [TOTP](struct.TOTP.html)
///
/// # Example
/// ```
/// use otp_core::{Algorithm, TotpConfig, TOTP};
///
/// let mut config = TotpConfig::new(b"TEST".to_vec()).unwrap();
/// config.code_length(4).algorithm(Algorithm::SHA512);
///
/// let totp = TOTP::from_config(config).unwrap();
/// assert_eq!(totp.generate_at(1706984502).unwrap(), "4442");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct TotpConfig {
    /// Non-encoded shared secret
    secret: Vec<u8>,
    /// 0 selects the default of 6
    #[cfg_attr(feature = "serde_support", serde(default))]
    code_length: usize,
    #[cfg_attr(feature = "serde_support", serde(default))]
    algorithm: Algorithm,
    /// Seconds per step, 0 selects the default of 30
    #[cfg_attr(feature = "serde_support", serde(default))]
    step: u64,
}

impl TotpConfig {
    /// Create a config with a 6 digits code, SHA1 and 30 seconds steps
    ///
    /// # Errors
    ///
    /// Will return an error if `secret` is empty
    pub fn new(secret: Vec<u8>) -> Result<TotpConfig, OtpError> {
        if secret.is_empty() {
            return Err(OtpError::EmptySecret);
        }
        Ok(TotpConfig {
            secret,
            code_length: crate::DEFAULT_CODE_LENGTH,
            algorithm: Algorithm::SHA1,
            step: crate::DEFAULT_STEP,
        })
    }

    /// Same as [new](#method.new), decoding the secret first
    pub fn from_secret(secret: &Secret) -> Result<TotpConfig, OtpError> {
        TotpConfig::new(secret.to_bytes()?)
    }

    /// Set the `code_length`
    pub fn code_length(&mut self, value: usize) -> &mut Self {
        self.code_length = value;
        self
    }

    /// Set the `algorithm`
    pub fn algorithm(&mut self, value: Algorithm) -> &mut Self {
        self.algorithm = value;
        self
    }

    /// Set the `step`
    pub fn step(&mut self, value: u64) -> &mut Self {
        self.step = value;
        self
    }
}

impl TryFrom<TotpConfig> for TOTP {
    type Error = OtpError;

    /// Try to create a [TOTP](struct.TOTP.html) from a [TotpConfig](struct.TotpConfig.html)
    fn try_from(config: TotpConfig) -> Result<Self, Self::Error> {
        let parameters = OtpParameters::new(config.algorithm, config.code_length, config.secret)?;
        Ok(TOTP::from_parameters(parameters, config.step))
    }
}
