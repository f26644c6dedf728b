// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{
	compare::{value_matches, Candidate},
	error::OtpError,
	otp::{Algorithm, Otp, OtpConfig},
	secret::Secret,
	uri,
};
use core::fmt::{self, Debug, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of a time step when the caller doesn't pick one, in seconds.
pub const DEFAULT_TIME_STEP: u64 = 30;
/// Steps on either side of the current one accepted by default.
pub const DEFAULT_WINDOW: u64 = 1;

/// Maps a unix timestamp onto the counter of the time step containing it.
///
/// ```rust
/// assert_eq!(otpauth::totp::time_to_counter(59, 30).unwrap(), 1);
/// assert_eq!(otpauth::totp::time_to_counter(60, 30).unwrap(), 2);
/// ```
pub fn time_to_counter(timestamp: u64, time_step: u64) -> Result<u64, OtpError> {
	timestamp
		.checked_div(time_step)
		.ok_or(OtpError::InvalidTimeStep)
}

/// A Time-based One-Time Password (TOTP) generator.
///
/// It is a one-time password generator that is based on the current time,
/// and as such, it takes a callback function that is called to get the
/// current time, allowing it to work on platforms without a system clock or
/// under test. The clock is read once per call.
///
/// ```rust
/// use otpauth::{Secret, Totp};
///
/// let secret = Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
/// let totp = Totp::new(secret, 8, None, None).unwrap();
/// assert_eq!(totp.at(59).unwrap().to_string(), "94287082");
/// // The code from the previous step is still accepted
/// assert_eq!(totp.verify_at("94287082", 89, None).unwrap(), Some(-1));
/// ```
#[derive(Clone)]
pub struct Totp {
	config: OtpConfig,
	time_step: u64,
	clock: fn() -> SystemTime,
}

impl Totp {
	/// Creates a new TOTP instance using the system clock, defaulting to
	/// 6 digits, SHA-1 and 30 second steps.
	pub fn new<L: Into<Option<u8>>, A: Into<Option<Algorithm>>, I: Into<Option<u64>>>(
		secret: Secret,
		digits: L,
		algorithm: A,
		time_step: I,
	) -> Result<Self, OtpError> {
		let config = OtpConfig::new(secret, digits, algorithm)?;
		Self::with_config(config, time_step)
	}

	/// Creates a new TOTP instance from base32 text in one step.
	pub fn from_base32(secret: &str) -> Result<Self, OtpError> {
		Self::new(Secret::from_base32(secret)?, None, None, None)
	}

	pub fn with_config<I: Into<Option<u64>>>(config: OtpConfig, time_step: I) -> Result<Self, OtpError> {
		let time_step = time_step.into().unwrap_or(DEFAULT_TIME_STEP);
		if time_step == 0 {
			return Err(OtpError::InvalidTimeStep);
		}
		Ok(Totp {
			config,
			time_step,
			clock: SystemTime::now,
		})
	}

	/// Replaces the system clock, e.g. with a fixed time under test.
	pub fn with_clock(mut self, clock: fn() -> SystemTime) -> Self {
		self.clock = clock;
		self
	}

	#[inline]
	pub fn config(&self) -> &OtpConfig {
		&self.config
	}

	#[inline]
	pub fn time_step(&self) -> u64 {
		self.time_step
	}

	#[inline]
	fn counter(&self, timestamp: u64) -> Result<u64, OtpError> {
		time_to_counter(timestamp, self.time_step)
	}

	/// Calculate the OTP value for the given time, represented as seconds
	/// from the unix epoch.
	pub fn generate(&self, timestamp: u64) -> Result<Otp, OtpError> {
		self.config.compute(self.counter(timestamp)?)
	}

	/// Same as [Totp::generate].
	#[inline]
	pub fn at(&self, timestamp: u64) -> Result<Otp, OtpError> {
		self.generate(timestamp)
	}

	/// Calculate the OTP value for the given [SystemTime], dropping any
	/// fraction of a second.
	pub fn at_system_time(&self, time: SystemTime) -> Result<Otp, OtpError> {
		self.generate(unix_seconds(time)?)
	}

	/// Calculate the OTP value for the current time. A clock reading
	/// before the unix epoch fails with [OtpError::ClockBeforeEpoch].
	pub fn now(&self) -> Result<Otp, OtpError> {
		self.at_system_time((self.clock)())
	}

	/// Checks a candidate code against the current time step and `window`
	/// (default 1) steps on either side of it. See [Totp::verify_at].
	pub fn verify<'a, C: Into<Candidate<'a>>, W: Into<Option<u64>>>(
		&self,
		candidate: C,
		window: W,
	) -> Result<Option<i64>, OtpError> {
		self.verify_at_system_time(candidate, (self.clock)(), window)
	}

	/// [Totp::verify_at] for a [SystemTime].
	pub fn verify_at_system_time<'a, C: Into<Candidate<'a>>, W: Into<Option<u64>>>(
		&self,
		candidate: C,
		time: SystemTime,
		window: W,
	) -> Result<Option<i64>, OtpError> {
		self.verify_at(candidate, unix_seconds(time)?, window)
	}

	/// Checks a candidate code against the step containing `timestamp` and
	/// `window` steps on either side of it, [DEFAULT_WINDOW] if `None`.
	///
	/// Offsets are tried nearest first, past before future: 0, -1, +1, -2,
	/// +2 and so on. On a match the signed offset in steps is returned. Steps
	/// before the epoch are skipped; steps past the end of the counter space
	/// fail with [OtpError::CounterOverflow].
	pub fn verify_at<'a, C: Into<Candidate<'a>>, W: Into<Option<u64>>>(
		&self,
		candidate: C,
		timestamp: u64,
		window: W,
	) -> Result<Option<i64>, OtpError> {
		let window = window.into().unwrap_or(DEFAULT_WINDOW);
		let window = i64::try_from(window).map_err(|_| OtpError::CounterOverflow)?;
		let candidate = candidate.into().value()?;
		let base = self.counter(timestamp)?;

		let offsets = core::iter::once(0).chain((1..=window).flat_map(|d| [-d, d]));
		for offset in offsets {
			let counter = match base.checked_add_signed(offset) {
				Some(counter) => counter,
				None if offset < 0 => continue,
				None => return Err(OtpError::CounterOverflow),
			};
			let expected = self.config.compute(counter)?;
			if value_matches(candidate, u64::from(*expected)) {
				tracing::debug!(offset, "totp code matched");
				return Ok(Some(offset));
			}
		}
		tracing::trace!(window, "totp code did not match");
		Ok(None)
	}

	/// Seconds left before the step containing `timestamp` rolls over.
	pub fn seconds_remaining(&self, timestamp: u64) -> u64 {
		self.time_step - timestamp % self.time_step
	}

	/// Builds the `otpauth://totp/...` URI for this generator. The secret
	/// isn't kept in text form, so the caller passes the base32 it
	/// provisioned with.
	pub fn provisioning_uri(&self, secret: &str, account_name: &str, issuer: Option<&str>) -> String {
		uri::build_uri(secret, account_name, issuer, None)
	}
}

impl Debug for Totp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Totp")
			.field("config", &self.config)
			.field("time_step", &self.time_step)
			.finish_non_exhaustive()
	}
}

fn unix_seconds(time: SystemTime) -> Result<u64, OtpError> {
	time.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.map_err(|_| OtpError::ClockBeforeEpoch)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn totp() -> Totp {
		Totp::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap()
	}

	#[test]
	fn counter_from_time() {
		assert_eq!(time_to_counter(0, 30).unwrap(), 0);
		assert_eq!(time_to_counter(29, 30).unwrap(), 0);
		assert_eq!(time_to_counter(30, 30).unwrap(), 1);
		assert_eq!(time_to_counter(1111111109, 30).unwrap(), 37037036);
		assert!(matches!(time_to_counter(10, 0), Err(OtpError::InvalidTimeStep)));
	}

	#[test]
	fn rejects_zero_time_step() {
		let secret = Secret::from_base32("GEZDGNBVGY3TQOJQ").unwrap();
		assert!(matches!(
			Totp::new(secret, None, None, 0),
			Err(OtpError::InvalidTimeStep)
		));
	}

	#[test]
	fn same_step_same_code() {
		let totp = totp();
		assert_eq!(totp.at(30).unwrap(), totp.at(59).unwrap());
		assert_eq!(totp.at(59).unwrap(), 287082);
		assert_eq!(totp.at(60).unwrap(), 359152);
	}

	#[test]
	fn system_time_matches_seconds() {
		let totp = totp();
		let time = UNIX_EPOCH + Duration::from_millis(59_999);
		assert_eq!(totp.at_system_time(time).unwrap(), totp.at(59).unwrap());
		let before = UNIX_EPOCH - Duration::from_secs(1);
		assert!(matches!(totp.at_system_time(before), Err(OtpError::ClockBeforeEpoch)));
	}

	#[test]
	fn uses_injected_clock() {
		let totp = totp().with_clock(|| UNIX_EPOCH + Duration::from_secs(59));
		assert_eq!(totp.now().unwrap(), 287082);
		assert_eq!(totp.verify("287082", 0).unwrap(), Some(0));
		assert_eq!(totp.verify("359152", 1).unwrap(), Some(1));
		assert_eq!(totp.verify("755224", 1).unwrap(), Some(-1));
		assert_eq!(totp.verify("969429", 1).unwrap(), None);
	}

	#[test]
	fn clock_before_epoch_is_an_error() {
		let totp = totp().with_clock(|| UNIX_EPOCH - Duration::from_secs(1));
		assert!(matches!(totp.now(), Err(OtpError::ClockBeforeEpoch)));
		assert!(matches!(
			totp.verify("755224", None),
			Err(OtpError::ClockBeforeEpoch)
		));
	}

	#[test]
	fn verify_window_defaults_to_one_step() {
		let totp = totp().with_clock(|| UNIX_EPOCH + Duration::from_secs(59));
		assert_eq!(totp.verify("755224", None).unwrap(), Some(-1));
		assert_eq!(totp.verify("359152", None).unwrap(), Some(1));
		assert_eq!(totp.verify("969429", None).unwrap(), None);
		assert_eq!(totp.verify_at("755224", 59, None).unwrap(), Some(-1));
	}

	#[test]
	fn verify_window_is_symmetric() {
		let totp = totp();
		let now = 10 * 30;
		for offset in -3i64..=3 {
			let step = (now as i64 / 30 + offset) as u64;
			let code = totp.at(step * 30).unwrap();
			assert_eq!(totp.verify_at(code, now, 3).unwrap(), Some(offset));
			let expected = if offset == 0 { Some(0) } else { None };
			assert_eq!(totp.verify_at(code, now, 0).unwrap(), expected);
		}
	}

	#[test]
	fn verify_is_idempotent() {
		let totp = totp();
		let code = totp.at(1234567890).unwrap().to_string();
		let first = totp.verify_at(&code, 1234567890, 1).unwrap();
		let second = totp.verify_at(&code, 1234567890, 1).unwrap();
		assert_eq!(first, Some(0));
		assert_eq!(first, second);
	}

	#[test]
	fn verify_skips_steps_before_epoch() {
		let totp = totp();
		assert_eq!(totp.verify_at("755224", 0, 2).unwrap(), Some(0));
		assert_eq!(totp.verify_at("287082", 0, 2).unwrap(), Some(1));
		assert_eq!(totp.verify_at("000000", 0, 2).unwrap(), None);
	}

	#[test]
	fn verify_rejects_overflowing_steps() {
		let secret = Secret::from_base32("GEZDGNBVGY3TQOJQ").unwrap();
		let totp = Totp::new(secret, None, None, 1).unwrap();
		let last = totp.at(u64::MAX).unwrap();
		assert_eq!(totp.verify_at(last, u64::MAX, 0).unwrap(), Some(0));
		assert!(matches!(
			totp.verify_at("000000", u64::MAX, 1),
			Err(OtpError::CounterOverflow)
		));
		assert!(matches!(
			totp.verify_at("000000", 0, u64::MAX),
			Err(OtpError::CounterOverflow)
		));
	}

	#[test]
	fn seconds_remaining_in_step() {
		let totp = totp();
		assert_eq!(totp.seconds_remaining(0), 30);
		assert_eq!(totp.seconds_remaining(29), 1);
		assert_eq!(totp.seconds_remaining(45), 15);
	}

	#[test]
	fn debug_hides_clock_and_secret() {
		let debug = format!("{:?}", totp());
		assert!(debug.contains("time_step: 30"));
		assert!(!debug.contains("GEZD"));
	}
}
