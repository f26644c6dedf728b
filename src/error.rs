// SPDX-License-Identifier: MIT OR Apache-2.0
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtpError {
	#[error("the secret is not valid base32")]
	InvalidSecretFormat,
	#[error("the secret must be base32 text or ASCII base32 bytes")]
	InvalidSecretType,
	#[error("cannot generate a base32 secret of {0} characters")]
	InvalidSecretLength(usize),
	#[error("unsupported digest algorithm `{0}`")]
	InvalidDigestAlgorithm(String),
	#[error("an OTP must have between 1 and 10 digits, got {0}")]
	InvalidDigits(u8),
	#[error("the TOTP time step must be at least one second")]
	InvalidTimeStep,
	#[error("the candidate code is not a decimal integer")]
	InvalidCandidateType,
	#[error("expected code {0} is outside the range of any generated code")]
	InvalidExpectedType(u64),
	#[error("the OTP counter has overflowed")]
	CounterOverflow,
	#[error("the given time is before the unix epoch")]
	ClockBeforeEpoch,
	#[error("the system random number generator failed")]
	Randomness(#[from] rand_core::Error),
}
