// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::{error::OtpError, secret::Secret};
use constant_time_eq::constant_time_eq;
use core::{
	fmt::{self, Display, Formatter},
	ops::Deref,
	str::FromStr,
};
use digest::{core_api::BlockSizeUser, KeyInit};
use hmac::{Mac, SimpleHmac};

/// Number of digits used when the caller doesn't ask for anything else.
pub const DEFAULT_DIGITS: u8 = 6;
/// The widest code the dynamic truncation can fill.
pub const MAX_DIGITS: u8 = 10;

/// The keyed-hash algorithms an OTP can be computed with.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Algorithm {
	/// HMAC-SHA-1, the only one most authenticator apps understand.
	#[default]
	Sha1,
	Sha256,
	Sha512,
}

impl Algorithm {
	/// The name used for this algorithm in provisioning URIs.
	pub fn name(self) -> &'static str {
		match self {
			Algorithm::Sha1 => "SHA1",
			Algorithm::Sha256 => "SHA256",
			Algorithm::Sha512 => "SHA512",
		}
	}

	fn hmac(self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, OtpError> {
		match self {
			Algorithm::Sha1 => keyed_hash::<sha1::Sha1>(key, message),
			Algorithm::Sha256 => keyed_hash::<sha2::Sha256>(key, message),
			Algorithm::Sha512 => keyed_hash::<sha2::Sha512>(key, message),
		}
	}
}

impl Display for Algorithm {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Algorithm {
	type Err = OtpError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().replace('-', "").as_str() {
			"SHA1" => Ok(Algorithm::Sha1),
			"SHA256" => Ok(Algorithm::Sha256),
			"SHA512" => Ok(Algorithm::Sha512),
			_ => Err(OtpError::InvalidDigestAlgorithm(s.to_owned())),
		}
	}
}

fn keyed_hash<D: digest::Digest + BlockSizeUser>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, OtpError> {
	let mut hasher = <SimpleHmac<D> as KeyInit>::new_from_slice(key)
		.map_err(|_| OtpError::InvalidSecretFormat)?;
	hasher.update(message);
	Ok(hasher.finalize().into_bytes().to_vec())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// A one-time password.
/// Can just be treated like a normal number, while also having a
/// [Display] implementation that shows it padded with zeroes.
pub struct Otp {
	code: u32,
	digits: u8,
}

impl Otp {
	#[inline]
	pub(crate) fn new(code: u32, digits: u8) -> Self {
		Self { code, digits }
	}

	/// Number of characters in the displayed code.
	#[inline]
	pub fn digits(&self) -> u8 {
		self.digits
	}
}

impl Deref for Otp {
	type Target = u32;

	#[inline]
	fn deref(&self) -> &Self::Target {
		&self.code
	}
}

impl AsRef<u32> for Otp {
	#[inline]
	fn as_ref(&self) -> &u32 {
		&self.code
	}
}

impl PartialEq<u32> for Otp {
	#[inline]
	fn eq(&self, other: &u32) -> bool {
		constant_time_eq(&self.code.to_be_bytes(), &other.to_be_bytes())
	}
}

impl Display for Otp {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{:0width$}", self.code, width = self.digits as usize)
	}
}

impl From<Otp> for String {
	fn from(otp: Otp) -> Self {
		otp.to_string()
	}
}

/// Everything an OTP generator needs besides the moving factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpConfig {
	secret: Secret,
	digits: u8,
	algorithm: Algorithm,
}

impl OtpConfig {
	/// Bundles a secret with a code length (default 6) and a digest
	/// algorithm (default SHA-1).
	pub fn new<L: Into<Option<u8>>, A: Into<Option<Algorithm>>>(
		secret: Secret,
		digits: L,
		algorithm: A,
	) -> Result<Self, OtpError> {
		let digits = digits.into().unwrap_or(DEFAULT_DIGITS);
		if !(1..=MAX_DIGITS).contains(&digits) {
			return Err(OtpError::InvalidDigits(digits));
		}
		Ok(OtpConfig {
			secret,
			digits,
			algorithm: algorithm.into().unwrap_or_default(),
		})
	}

	#[inline]
	pub fn digits(&self) -> u8 {
		self.digits
	}

	#[inline]
	pub fn algorithm(&self) -> Algorithm {
		self.algorithm
	}

	/// Calculates the code for a single counter value.
	#[inline]
	pub fn compute(&self, counter: u64) -> Result<Otp, OtpError> {
		compute(self.secret.as_bytes(), counter, self.digits, self.algorithm)
	}
}

/// Computes an HOTP value (RFC 4226 section 5.3) for an arbitrary key and
/// counter.
///
/// ```rust
/// use otpauth::{otp::compute, Algorithm};
///
/// let otp = compute(b"12345678901234567890", 0, 6, Algorithm::Sha1).unwrap();
/// assert_eq!(otp, 755224);
/// assert_eq!(otp.to_string(), "755224");
/// ```
pub fn compute(secret: &[u8], counter: u64, digits: u8, algorithm: Algorithm) -> Result<Otp, OtpError> {
	if !(1..=MAX_DIGITS).contains(&digits) {
		return Err(OtpError::InvalidDigits(digits));
	}
	// The HMAC input is the counter, always as 8 big-endian bytes.
	let digest = algorithm.hmac(secret, &counter.to_be_bytes())?;
	// The low nibble of the last byte picks where the 4 code bytes start.
	let offset = (*digest.last().ok_or_else(|| too_short(algorithm))? & 0xF) as usize;
	let bytes = digest
		.get(offset..offset + 4)
		.ok_or_else(|| too_short(algorithm))?;
	let mut code = [0u8; 4];
	code.copy_from_slice(bytes);
	let binary = u32::from_be_bytes(code) & 0x7fff_ffff;
	// 10^10 overflows a u32, but the 31-bit binary is always below it.
	let code = u64::from(binary) % 10_u64.pow(u32::from(digits));
	Ok(Otp::new(code as u32, digits))
}

fn too_short(algorithm: Algorithm) -> OtpError {
	OtpError::InvalidDigestAlgorithm(algorithm.name().to_owned())
}
