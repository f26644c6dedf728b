// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{
	compare::{value_matches, Candidate},
	error::OtpError,
	otp::{Algorithm, Otp, OtpConfig},
	secret::Secret,
	uri,
};

/// A hash-based One-Time Password (HOTP) generator.
///
/// It is a one-time password generator that is based on a counter, which the
/// caller stores and usually increments by 1 after each successful login.
///
/// ```rust
/// use otpauth::{Hotp, Secret};
///
/// let secret = Secret::from_base32("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
/// let hotp = Hotp::new(secret, None, None).unwrap();
/// // Calculate the OTP value for a counter of "0"
/// let otp = hotp.generate(0).unwrap();
/// assert_eq!(otp, 755224);
/// assert_eq!(otp.to_string(), "755224");
/// // A code from two logins ahead is accepted within a window of 2
/// assert_eq!(hotp.verify("359152", 0, 2).unwrap(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotp {
	config: OtpConfig,
}

impl Hotp {
	/// Creates a new HOTP instance, defaulting to 6 digits and SHA-1.
	pub fn new<L: Into<Option<u8>>, A: Into<Option<Algorithm>>>(
		secret: Secret,
		digits: L,
		algorithm: A,
	) -> Result<Self, OtpError> {
		OtpConfig::new(secret, digits, algorithm).map(Self::with_config)
	}

	/// Creates a new HOTP instance from base32 text in one step.
	pub fn from_base32(secret: &str) -> Result<Self, OtpError> {
		Self::new(Secret::from_base32(secret)?, None, None)
	}

	#[inline]
	pub fn with_config(config: OtpConfig) -> Self {
		Hotp { config }
	}

	#[inline]
	pub fn config(&self) -> &OtpConfig {
		&self.config
	}

	/// Calculate the OTP value for the given counter.
	#[inline]
	pub fn generate(&self, counter: u64) -> Result<Otp, OtpError> {
		self.config.compute(counter)
	}

	/// Same as [Hotp::generate].
	#[inline]
	pub fn at(&self, counter: u64) -> Result<Otp, OtpError> {
		self.generate(counter)
	}

	/// Checks a candidate code against `counter` and up to `window` counters
	/// after it (none if `window` is `None`), returning the first counter
	/// that produces the code.
	///
	/// Nothing is stored: the caller should persist the returned counter
	/// (plus one) as its new baseline. A wrong code is `Ok(None)`.
	pub fn verify<'a, C: Into<Candidate<'a>>, W: Into<Option<u64>>>(
		&self,
		candidate: C,
		counter: u64,
		window: W,
	) -> Result<Option<u64>, OtpError> {
		let window = window.into().unwrap_or(0);
		let last = counter
			.checked_add(window)
			.ok_or(OtpError::CounterOverflow)?;
		let candidate = candidate.into().value()?;
		for c in counter..=last {
			let expected = self.generate(c)?;
			if value_matches(candidate, u64::from(*expected)) {
				tracing::debug!(counter = c, baseline = counter, "hotp code matched");
				return Ok(Some(c));
			}
		}
		tracing::trace!(baseline = counter, window, "hotp code did not match");
		Ok(None)
	}

	/// Builds the `otpauth://hotp/...` URI for this generator. The secret
	/// isn't kept in text form, so the caller passes the base32 it
	/// provisioned with.
	pub fn provisioning_uri(
		&self,
		secret: &str,
		account_name: &str,
		issuer: Option<&str>,
		initial_counter: u64,
	) -> String {
		uri::build_uri(secret, account_name, issuer, Some(initial_counter))
	}
}
