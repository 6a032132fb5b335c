use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current Unix time, in whole seconds.
///
/// [TOTP](struct.TOTP.html) reads the clock only in `generate` and `validate`;
/// every other operation takes an explicit timestamp. Any `Fn() -> i64`
/// closure is a clock, which is handy in tests:
///
/// ```
/// use otp_core::{Algorithm, TOTP};
///
/// let totp = TOTP::new(Algorithm::SHA1, 6, 30, b"12345678901234567890".to_vec())
///     .unwrap()
///     .with_clock(|| 59);
/// assert_eq!(totp.generate().unwrap(), "287082");
/// ```
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock backed by [SystemTime](std::time::SystemTime).
///
/// Instants before the epoch come out negative and are rejected by the
/// generators.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(e) => {
                // floor, so -0.5s is second -1
                let before = e.duration();
                let secs = before.as_secs() + u64::from(before.subsec_nanos() > 0);
                i64::try_from(secs).map_or(i64::MIN, |secs| -secs)
            }
        }
    }
}

impl<F> Clock for F
where
    F: Fn() -> i64,
{
    fn now(&self) -> i64 {
        self()
    }
}
