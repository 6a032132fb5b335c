use core::fmt;

use crate::{Algorithm, HotpConfig, OtpError, OtpParameters};

/// HOTP holds a credential's counter along with how to generate and validate its codes, per [rfc-4226](https://tools.ietf.org/html/rfc4226)
///
/// The counter only moves forward, and only through [generate](#method.generate) or a successful [validate](#method.validate).
/// Both take `&mut self`: concurrent callers sharing one credential must serialize access themselves, typically one
/// `Mutex<HOTP>` per user/device pairing. Letting two calls race would skip or repeat counter values.
///
/// Persisting the counter between calls is the caller's job, see [to_config](#method.to_config).
#[derive(Debug, Clone)]
pub struct HOTP<T = Vec<u8>> {
    parameters: OtpParameters<T>,
    /// May be negative, but such a counter cannot produce or validate codes until it is replaced
    counter: i64,
    /// How many counter values past the current one validation will look at. 0 means exact match only
    sync_window: u32,
}

impl<T: AsRef<[u8]>> PartialEq for HOTP<T> {
    fn eq(&self, other: &Self) -> bool {
        self.counter == other.counter
            && self.sync_window == other.sync_window
            && self.parameters == other.parameters
    }
}

impl<T> fmt::Display for HOTP<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; counter: {}; window: {}; alg: {}",
            self.parameters.code_length, self.counter, self.sync_window, self.parameters.algorithm,
        )
    }
}

impl<T: AsRef<[u8]>> HOTP<T> {
    /// Will create a new instance of HOTP with given parameters
    ///
    /// * `code_length`: 0 selects the default of 6
    /// * `secret`: non-encoded value, to pass in base32 string use `Secret::Encoded(String)`
    /// * `counter`: the next counter value to generate or expect
    /// * `sync_window`: how far ahead of `counter` a validated code may be
    ///
    /// ```rust
    /// use otp_core::{Algorithm, Secret, HOTP};
    /// let secret = Secret::Encoded("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".to_string());
    /// let hotp = HOTP::new(Algorithm::SHA1, 6, secret.to_bytes().unwrap(), 0, 3).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Will return an error if `secret` is empty
    pub fn new(
        algorithm: Algorithm,
        code_length: usize,
        secret: T,
        counter: i64,
        sync_window: u32,
    ) -> Result<HOTP<T>, OtpError> {
        let parameters = OtpParameters::new(algorithm, code_length, secret)?;
        Ok(HOTP::from_parameters(parameters, counter, sync_window))
    }

    pub fn from_parameters(
        parameters: OtpParameters<T>,
        counter: i64,
        sync_window: u32,
    ) -> HOTP<T> {
        HOTP {
            parameters,
            counter,
            sync_window,
        }
    }

    pub fn parameters(&self) -> &OtpParameters<T> {
        &self.parameters
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn sync_window(&self) -> u32 {
        self.sync_window
    }

    /// Will generate the code for an arbitrary counter value, without touching the credential's counter
    pub fn generate_at(&self, counter: i64) -> Result<String, OtpError> {
        self.parameters.generate(counter)
    }

    /// Will generate the code for the current counter and advance the counter by one
    ///
    /// # Errors
    ///
    /// Will return an error, leaving the counter untouched, if the counter is negative or cannot be advanced
    pub fn generate(&mut self) -> Result<String, OtpError> {
        let code = self.parameters.generate(self.counter)?;
        self.counter = self.counter.checked_add(1).ok_or(OtpError::CounterOverflow)?;
        Ok(code)
    }

    /// Will check `candidate` against the codes for `counter ..= counter + sync_window`, in that order
    ///
    /// On the first match the counter moves to one past the matched value, so the next expected code
    /// follows the one just accepted. Without a match the counter is left as it was and `false` is returned.
    /// Candidates that are not even numeric just fail to match.
    ///
    /// Counter values below 0 are skipped, so a negative counter still validates codes its window reaches.
    ///
    /// # Errors
    ///
    /// Will return an error if the whole window is negative. Counter values past `i64::MAX` are never searched.
    pub fn validate(&mut self, candidate: &str) -> Result<bool, OtpError> {
        let last = self.counter.saturating_add(i64::from(self.sync_window));
        if last < 0 {
            return Err(OtpError::NegativeCounter(self.counter));
        }
        for counter in self.counter.max(0)..=last {
            if self.parameters.matches(counter, candidate)? {
                let next = counter.checked_add(1).ok_or(OtpError::CounterOverflow)?;
                if counter != self.counter {
                    log::debug!(
                        "hotp counter resynchronized from {} to {}",
                        self.counter,
                        next
                    );
                }
                self.counter = next;
                return Ok(true);
            }
        }
        log::debug!(
            "hotp code rejected at counter {} with window {}",
            self.counter,
            self.sync_window
        );
        Ok(false)
    }

    /// Snapshot of this credential, current counter included, for persistence
    pub fn to_config(&self) -> HotpConfig {
        HotpConfig::from_hotp(self)
    }
}

impl HOTP {
    /// Will create a new instance of HOTP from the given [HotpConfig](struct.HotpConfig.html)
    ///
    /// # Errors
    ///
    /// Will return an error if the configured secret is empty
    pub fn from_config(config: HotpConfig) -> Result<HOTP, OtpError> {
        Self::try_from(config)
    }
}
