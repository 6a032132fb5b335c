use core::fmt;

use crate::{Algorithm, Clock, OtpError, OtpParameters, SystemClock, TotpConfig};

/// Step length used when none (or zero) is configured, per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2)
pub const DEFAULT_STEP: u64 = 30;

/// TOTP holds informations as to how to generate an auth code from a point in time and validate it, per [rfc-6238](https://tools.ietf.org/html/rfc6238)
///
/// Nothing in a TOTP changes after construction, so one instance can serve any number of concurrent validations.
/// The wall clock is only read by [generate](#method.generate) and [validate](#method.validate), through the [Clock](trait.Clock.html) it was built with.
#[derive(Debug, Clone)]
pub struct TOTP<T = Vec<u8>, C = SystemClock> {
    parameters: OtpParameters<T>,
    /// Duration in seconds of a step. The recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2) is 30 seconds
    step: u64,
    clock: C,
}

impl<T: AsRef<[u8]>, C> PartialEq for TOTP<T, C> {
    /// Clocks are not compared, they take no part in code generation
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step && self.parameters == other.parameters
    }
}

impl<T, C> fmt::Display for TOTP<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; step: {}; alg: {}",
            self.parameters.code_length, self.step, self.parameters.algorithm,
        )
    }
}

impl<T: AsRef<[u8]>> TOTP<T> {
    /// Will create a new instance of TOTP with given parameters, reading time from the system clock
    ///
    /// * `code_length`: 0 selects the default of 6
    /// * `step`: 0 selects the default of 30 seconds
    /// * `secret`: non-encoded value, to pass in base32 string use `Secret::Encoded(String)`
    ///
    /// ```rust
    /// use otp_core::{Algorithm, Secret, TOTP};
    /// let secret = Secret::Encoded("KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ".to_string());
    /// let totp = TOTP::new(Algorithm::SHA1, 6, 30, secret.to_bytes().unwrap()).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Will return an error if `secret` is empty
    pub fn new(
        algorithm: Algorithm,
        code_length: usize,
        step: u64,
        secret: T,
    ) -> Result<TOTP<T>, OtpError> {
        let parameters = OtpParameters::new(algorithm, code_length, secret)?;
        Ok(TOTP::from_parameters(parameters, step))
    }

    pub fn from_parameters(parameters: OtpParameters<T>, step: u64) -> TOTP<T> {
        TOTP {
            parameters,
            step: if step == 0 { DEFAULT_STEP } else { step },
            clock: SystemClock,
        }
    }
}

impl TOTP {
    /// Will create a new instance of TOTP from the given [TotpConfig](struct.TotpConfig.html)
    ///
    /// # Errors
    ///
    /// Will return an error if the configured secret is empty
    pub fn from_config(config: TotpConfig) -> Result<TOTP, OtpError> {
        Self::try_from(config)
    }
}

impl<T: AsRef<[u8]>, C: Clock> TOTP<T, C> {
    /// Replace the clock read by [generate](#method.generate) and [validate](#method.validate)
    pub fn with_clock<D: Clock>(self, clock: D) -> TOTP<T, D> {
        TOTP {
            parameters: self.parameters,
            step: self.step,
            clock,
        }
    }

    pub fn parameters(&self) -> &OtpParameters<T> {
        &self.parameters
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Index of the step containing `timestamp`, counted from the Unix epoch
    ///
    /// # Errors
    ///
    /// Will return an error for a negative `timestamp`
    pub fn time_step(&self, timestamp: i64) -> Result<i64, OtpError> {
        let seconds =
            u64::try_from(timestamp).map_err(|_| OtpError::NegativeTimestamp(timestamp))?;
        let time_step = i64::try_from(seconds / self.step).map_err(|_| OtpError::CounterOverflow)?;
        log::trace!("timestamp {} falls in time step {}", timestamp, time_step);
        Ok(time_step)
    }

    /// Will generate a code for the provided timestamp in seconds
    pub fn generate_at(&self, timestamp: i64) -> Result<String, OtpError> {
        self.parameters.generate(self.time_step(timestamp)?)
    }

    /// Will generate a code for the current time
    pub fn generate(&self) -> Result<String, OtpError> {
        self.generate_at(self.clock.now())
    }

    /// Will check if `candidate` is the code for the provided timestamp in seconds
    ///
    /// Only the step containing `timestamp` is accepted, see
    /// [validate_at_with_skew](#method.validate_at_with_skew) to tolerate clock drift.
    pub fn validate_at(&self, timestamp: i64, candidate: &str) -> Result<bool, OtpError> {
        self.parameters.matches(self.time_step(timestamp)?, candidate)
    }

    /// Will check if `candidate` is the code for the current time
    pub fn validate(&self, candidate: &str) -> Result<bool, OtpError> {
        self.validate_at(self.clock.now(), candidate)
    }

    /// Will check `candidate` against the steps from `skew` before to `skew` after the one containing `timestamp`
    ///
    /// Steps before the epoch are skipped. A `skew` of 0 behaves like [validate_at](#method.validate_at).
    pub fn validate_at_with_skew(
        &self,
        timestamp: i64,
        candidate: &str,
        skew: u8,
    ) -> Result<bool, OtpError> {
        let base = self.time_step(timestamp)?;
        let skew = i64::from(skew);
        let first = base.saturating_sub(skew).max(0);
        let last = base.saturating_add(skew);
        for time_step in first..=last {
            if self.parameters.matches(time_step, candidate)? {
                if time_step != base {
                    log::debug!("totp code accepted {} steps off", time_step - base);
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Will check `candidate` against the current time, accounting for `skew`
    pub fn validate_with_skew(&self, candidate: &str, skew: u8) -> Result<bool, OtpError> {
        self.validate_at_with_skew(self.clock.now(), candidate, skew)
    }

    /// Returns the timestamp of the first second of the step after the one containing `timestamp`
    pub fn next_step(&self, timestamp: i64) -> Result<i64, OtpError> {
        let step = i64::try_from(self.step).map_err(|_| OtpError::CounterOverflow)?;
        self.time_step(timestamp)?
            .checked_add(1)
            .and_then(|next| next.checked_mul(step))
            .ok_or(OtpError::CounterOverflow)
    }

    /// Returns the timestamp of the first second of the next step, according to the clock
    pub fn next_step_current(&self) -> Result<i64, OtpError> {
        self.next_step(self.clock.now())
    }

    /// Seconds left before the code for `timestamp` expires
    pub fn ttl_at(&self, timestamp: i64) -> Result<u64, OtpError> {
        let seconds =
            u64::try_from(timestamp).map_err(|_| OtpError::NegativeTimestamp(timestamp))?;
        Ok(self.step - (seconds % self.step))
    }

    /// Give the ttl (in seconds) of the current code
    pub fn ttl(&self) -> Result<u64, OtpError> {
        self.ttl_at(self.clock.now())
    }
}
