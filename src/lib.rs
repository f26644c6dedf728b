// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-time passwords as used by authenticator apps: counter-based HOTP
//! ([RFC 4226](https://datatracker.ietf.org/doc/html/rfc4226)) and
//! time-based TOTP ([RFC 6238](https://datatracker.ietf.org/doc/html/rfc6238)).
//!
//! ```rust
//! use otpauth::{Secret, Totp};
//!
//! let secret = otpauth::generate_secret(16)?;
//! let totp = Totp::new(Secret::from_base32(&secret)?, None, None, None)?;
//! let code = totp.now()?.to_string();
//! assert_eq!(code.len(), 6);
//! assert!(totp.verify(&code, 1)?.is_some());
//! # Ok::<(), otpauth::OtpError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod compare;
pub mod error;
pub mod hotp;
pub mod otp;
pub mod secret;
pub mod totp;
pub mod uri;

pub use compare::{compare, Candidate};
pub use error::OtpError;
pub use hotp::Hotp;
pub use otp::{Algorithm, Otp, OtpConfig};
pub use secret::{generate_secret, generate_secret_with, Secret, SecretInput, DEFAULT_SECRET_LENGTH};
pub use totp::Totp;
pub use uri::build_uri;
