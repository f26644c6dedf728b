// SPDX-License-Identifier: MIT OR Apache-2.0
//! `otpauth://` provisioning URIs, the payload authenticator apps read out
//! of enrolment QR codes.

use std::borrow::Cow;

/// Percent-encodes a label or parameter value, leaving `@` readable.
///
/// `urlencoding` escapes every byte outside the unreserved set and never
/// emits a `%` other than as the start of an escape, so `%40` can only
/// stand for `@`.
fn encode(component: &str) -> Cow<'_, str> {
	match urlencoding::encode(component) {
		Cow::Owned(encoded) if encoded.contains("%40") => Cow::Owned(encoded.replace("%40", "@")),
		encoded => encoded,
	}
}

/// Builds a provisioning URI. The type is `hotp` when an initial counter is
/// given and `totp` otherwise.
///
/// Label and query values are percent-encoded the same way, so a space is
/// `%20` everywhere, including the `issuer` parameter where form encoding
/// would give `+`. Authenticator apps accept both.
///
/// ```rust
/// let uri = otpauth::build_uri("JBSWY3DPEHPK3PXP", "alice@example.com", Some("ACME"), None);
/// assert_eq!(
/// 	uri,
/// 	"otpauth://totp/ACME:alice@example.com?secret=JBSWY3DPEHPK3PXP&issuer=ACME"
/// );
/// ```
pub fn build_uri(
	secret: &str,
	account_name: &str,
	issuer: Option<&str>,
	initial_counter: Option<u64>,
) -> String {
	let kind = if initial_counter.is_some() { "hotp" } else { "totp" };
	let mut uri = format!("otpauth://{kind}/");
	if let Some(issuer) = issuer {
		uri.push_str(&encode(issuer));
		uri.push(':');
	}
	uri.push_str(&encode(account_name));

	uri.push_str("?secret=");
	uri.push_str(&encode(secret));
	if let Some(counter) = initial_counter {
		uri.push_str(&format!("&counter={counter}"));
	}
	if let Some(issuer) = issuer {
		uri.push_str("&issuer=");
		uri.push_str(&encode(issuer));
	}
	uri
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn totp_with_issuer() {
		assert_eq!(
			build_uri("JBSWY3DPEHPK3PXP", "alice@example.com", Some("ACME"), None),
			"otpauth://totp/ACME:alice@example.com?secret=JBSWY3DPEHPK3PXP&issuer=ACME"
		);
	}

	#[test]
	fn totp_without_issuer() {
		assert_eq!(
			build_uri("JBSWY3DPEHPK3PXP", "alice@example.com", None, None),
			"otpauth://totp/alice@example.com?secret=JBSWY3DPEHPK3PXP"
		);
	}

	#[test]
	fn hotp_with_zero_counter() {
		assert_eq!(
			build_uri("JBSWY3DPEHPK3PXP", "alice", Some("ACME"), Some(0)),
			"otpauth://hotp/ACME:alice?secret=JBSWY3DPEHPK3PXP&counter=0&issuer=ACME"
		);
	}

	#[test]
	fn escapes_reserved_characters() {
		assert_eq!(
			build_uri("JBSWY3DPEHPK3PXP", "bob smith:home", Some("Big Co&Sons"), None),
			"otpauth://totp/Big%20Co%26Sons:bob%20smith%3Ahome?secret=JBSWY3DPEHPK3PXP&issuer=Big%20Co%26Sons"
		);
	}

	#[test]
	fn issuer_spaces_are_percent_encoded_in_query() {
		let uri = build_uri("JBSWY3DPEHPK3PXP", "a b/c", Some("Big Co"), None);
		assert_eq!(
			uri,
			"otpauth://totp/Big%20Co:a%20b%2Fc?secret=JBSWY3DPEHPK3PXP&issuer=Big%20Co"
		);
	}

	#[test]
	fn keeps_at_sign_but_escapes_percent() {
		assert_eq!(encode("a@b"), "a@b");
		assert_eq!(encode("%40"), "%2540");
		assert_eq!(encode("ü@x"), "%C3%BC@x");
	}
}
