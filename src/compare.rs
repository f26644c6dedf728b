// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timing-safe comparison of user-supplied codes.
//!
//! The expected value comes from trusted code and is only ever touched by
//! the final fixed-cost comparison. The candidate is attacker-controlled, so
//! all of its parsing happens up front and only depends on the candidate
//! itself.

use crate::{error::OtpError, otp::Otp};
use constant_time_eq::constant_time_eq;

/// Longest decimal prefix of a text candidate that is looked at. Anything
/// after it is ignored, which bounds the parsing work.
pub const MAX_CANDIDATE_DIGITS: usize = 309;

/// Largest value a generated code can ever take.
pub const MAX_EXPECTED: u64 = 9_999_999_999;

/// A code as submitted by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
	/// Decimal text, leading zeroes allowed.
	Text(&'a str),
	/// Decimal text as raw bytes, e.g. straight out of a request body.
	Bytes(&'a [u8]),
	Integer(u64),
}

impl<'a> From<&'a str> for Candidate<'a> {
	fn from(text: &'a str) -> Self {
		Candidate::Text(text)
	}
}

impl<'a> From<&'a String> for Candidate<'a> {
	fn from(text: &'a String) -> Self {
		Candidate::Text(text)
	}
}

impl<'a> From<&'a [u8]> for Candidate<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Candidate::Bytes(bytes)
	}
}

impl From<u64> for Candidate<'_> {
	fn from(value: u64) -> Self {
		Candidate::Integer(value)
	}
}

impl From<u32> for Candidate<'_> {
	fn from(value: u32) -> Self {
		Candidate::Integer(value.into())
	}
}

impl From<Otp> for Candidate<'_> {
	fn from(otp: Otp) -> Self {
		Candidate::Integer((*otp).into())
	}
}

impl Candidate<'_> {
	/// Reduces the candidate to an integer.
	///
	/// Values that cannot equal any code (negative, or too large for a
	/// `u64`) saturate to `u64::MAX`, which is above [MAX_EXPECTED].
	pub(crate) fn value(&self) -> Result<u64, OtpError> {
		match *self {
			Candidate::Integer(value) => Ok(value),
			Candidate::Text(text) => parse_decimal(text),
			Candidate::Bytes(bytes) => core::str::from_utf8(bytes)
				.map_err(|_| OtpError::InvalidCandidateType)
				.and_then(parse_decimal),
		}
	}
}

fn parse_decimal(text: &str) -> Result<u64, OtpError> {
	let end = text
		.char_indices()
		.nth(MAX_CANDIDATE_DIGITS)
		.map_or(text.len(), |(index, _)| index);
	let text = text[..end].trim();

	let (negative, digits) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return Err(OtpError::InvalidCandidateType);
	}

	let value = digits.bytes().fold(Some(0u64), |acc, b| {
		acc.and_then(|acc| acc.checked_mul(10))
			.and_then(|acc| acc.checked_add(u64::from(b - b'0')))
	});
	Ok(match value {
		Some(0) => 0,
		Some(value) if !negative => value,
		_ => u64::MAX,
	})
}

/// Compares an already reduced candidate against a trusted code without
/// branching on where they differ.
#[inline]
pub(crate) fn value_matches(candidate: u64, expected: u64) -> bool {
	constant_time_eq(&candidate.to_be_bytes(), &expected.to_be_bytes())
}

/// Checks a user-supplied code against the expected one in constant time.
///
/// `"007"`, `"7"` and `7` all match an expected value of 7. Text that isn't
/// a decimal integer fails with [OtpError::InvalidCandidateType]; an
/// expected value no generator could have produced fails with
/// [OtpError::InvalidExpectedType].
///
/// ```rust
/// use otpauth::compare;
///
/// assert!(compare("007", 7).unwrap());
/// assert!(compare(7u64, 7).unwrap());
/// assert!(!compare("008", 7).unwrap());
/// ```
pub fn compare<'a, C: Into<Candidate<'a>>>(candidate: C, expected: u64) -> Result<bool, OtpError> {
	if expected > MAX_EXPECTED {
		return Err(OtpError::InvalidExpectedType(expected));
	}
	let candidate = candidate.into().value()?;
	Ok(value_matches(candidate, expected))
}
