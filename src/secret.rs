// SPDX-License-Identifier: MIT OR Apache-2.0
//! Base32 shared secrets.
//!
//! Secrets are exchanged as RFC 4648 base32 text, case-insensitively.
//! Decoding is strict about the alphabet and about padding, except that a
//! secret with no padding at all is padded up to a full block first, which
//! is how most providers print them.

use crate::error::OtpError;
use core::fmt::{self, Debug, Formatter};
use data_encoding::{Encoding, Specification, BASE32};
use rand_core::{CryptoRng, OsRng, RngCore};

/// Number of base32 characters produced by [generate_secret] when the
/// caller has no preference.
pub const DEFAULT_SECRET_LENGTH: usize = 16;

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BLOCK: usize = 8;

/// Raw caller input for a secret, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretInput<'a> {
	/// Base32 text.
	Text(&'a str),
	/// Base32 text as received on the wire, which must be ASCII.
	Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for SecretInput<'a> {
	fn from(text: &'a str) -> Self {
		SecretInput::Text(text)
	}
}

impl<'a> From<&'a String> for SecretInput<'a> {
	fn from(text: &'a String) -> Self {
		SecretInput::Text(text)
	}
}

impl<'a> From<&'a [u8]> for SecretInput<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		SecretInput::Bytes(bytes)
	}
}

impl<'a, const N: usize> From<&'a [u8; N]> for SecretInput<'a> {
	fn from(bytes: &'a [u8; N]) -> Self {
		SecretInput::Bytes(bytes)
	}
}

/// A decoded shared secret. Never empty.
///
/// The bytes are only reachable from inside the crate and are redacted from
/// the [Debug] output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
	bytes: Vec<u8>,
}

impl Secret {
	/// Decodes a base32 secret.
	///
	/// ```rust
	/// use otpauth::Secret;
	///
	/// assert!(Secret::from_base32("JBSWY3DPEHPK3PXP").is_ok());
	/// assert!(Secret::from_base32("jbswy3dpehpk3pxp").is_ok());
	/// assert!(Secret::from_base32("JBSWY3DPEHPK3PX1").is_err());
	/// ```
	pub fn from_base32<'a, S: Into<SecretInput<'a>>>(secret: S) -> Result<Self, OtpError> {
		decode(secret).map(|bytes| Secret { bytes })
	}

	#[inline]
	pub(crate) fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Length of the decoded key, in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Always false: empty secrets are rejected on construction.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}
}

impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Secret")
			.field("len", &self.bytes.len())
			.finish_non_exhaustive()
	}
}

/// Decodes base32 text into raw key bytes.
///
/// Fails with [OtpError::InvalidSecretType] for byte input that is not
/// ASCII, and with [OtpError::InvalidSecretFormat] for anything that is not
/// well-formed base32 or that decodes to nothing.
pub fn decode<'a, S: Into<SecretInput<'a>>>(secret: S) -> Result<Vec<u8>, OtpError> {
	let text = match secret.into() {
		SecretInput::Text(text) => text,
		SecretInput::Bytes(bytes) => {
			if !bytes.is_ascii() {
				tracing::debug!("rejected non-ascii secret bytes");
				return Err(OtpError::InvalidSecretType);
			}
			core::str::from_utf8(bytes).map_err(|_| OtpError::InvalidSecretType)?
		}
	};

	let mut padded = String::with_capacity(text.len() + BLOCK);
	padded.push_str(text);
	if !text.contains('=') {
		let missing = (BLOCK - text.len() % BLOCK) % BLOCK;
		padded.extend(core::iter::repeat('=').take(missing));
	}

	let bytes = decoder()?
		.decode(padded.as_bytes())
		.map_err(|err| {
			tracing::debug!(position = err.position, "rejected malformed base32 secret");
			OtpError::InvalidSecretFormat
		})?;
	if bytes.is_empty() {
		return Err(OtpError::InvalidSecretFormat);
	}
	Ok(bytes)
}

// Padded RFC 4648 base32 that folds lowercase input and, like most
// authenticator apps, ignores the unused low bits of a final partial symbol.
fn decoder() -> Result<Encoding, OtpError> {
	let mut spec = Specification::new();
	spec.symbols.push_str(ALPHABET);
	spec.padding = Some('=');
	spec.check_trailing_bits = false;
	spec.translate.from.push_str(&ALPHABET[..26].to_ascii_lowercase());
	spec.translate.to.push_str(&ALPHABET[..26]);
	spec.encoding().map_err(|_| OtpError::InvalidSecretFormat)
}

/// Generates a random base32 secret of `length` characters from the
/// operating system's secure random number generator.
///
/// ```rust
/// let secret = otpauth::generate_secret(16).unwrap();
/// assert_eq!(secret.len(), 16);
/// assert!(otpauth::Secret::from_base32(&secret).is_ok());
/// ```
pub fn generate_secret(length: usize) -> Result<String, OtpError> {
	generate_secret_with(&mut OsRng, length)
}

/// Generates a random base32 secret of `length` characters from the given
/// cryptographically secure generator.
///
/// Enough bytes are drawn to cover `length` characters at five bits each,
/// and the encoding is cut to exactly `length` characters. A length of zero
/// is refused.
///
/// Base32 text whose length modulo 8 is 1, 3 or 6 is not well-formed, so
/// secrets of those lengths are produced but won't pass [decode]. Stick to
/// lengths such as 16 or 32 for secrets meant to be used here.
pub fn generate_secret_with<R: CryptoRng + RngCore + ?Sized>(
	rng: &mut R,
	length: usize,
) -> Result<String, OtpError> {
	if length == 0 {
		return Err(OtpError::InvalidSecretLength(length));
	}
	let byte_length = (length * 5 + 7) / 8;
	let mut random = vec![0u8; byte_length];
	rng.try_fill_bytes(&mut random)?;

	let mut secret = BASE32.encode(&random);
	secret.truncate(length);
	tracing::trace!(length, "generated base32 secret");
	Ok(secret)
}
