// SPDX-License-Identifier: MIT OR Apache-2.0
use data_encoding::BASE32;
use otpauth::{Algorithm, Hotp, Secret, Totp};

const SHA1_KEY: &[u8] = b"12345678901234567890";
const SHA256_KEY: &[u8] = b"12345678901234567890123456789012";
const SHA512_KEY: &[u8] = b"1234567890123456789012345678901234567890123456789012345678901234";

fn secret(key: &[u8]) -> Secret {
	Secret::from_base32(BASE32.encode(key).as_str()).unwrap()
}

#[test]
fn rfc4226_appendix_d() {
	let hotp = Hotp::new(secret(SHA1_KEY), 6, Algorithm::Sha1).unwrap();
	let expected = [
		"755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583", "399871",
		"520489",
	];
	for (counter, code) in expected.iter().enumerate() {
		assert_eq!(hotp.generate(counter as u64).unwrap().to_string(), *code);
		assert_eq!(hotp.verify(*code, counter as u64, 0).unwrap(), Some(counter as u64));
	}
}

#[test]
fn rfc6238_appendix_b() {
	let rows: [(u64, &str, &str, &str); 6] = [
		(59, "94287082", "46119246", "90693936"),
		(1111111109, "07081804", "68084774", "25091201"),
		(1111111111, "14050471", "67062674", "99943326"),
		(1234567890, "89005924", "91819424", "93441116"),
		(2000000000, "69279037", "90698825", "38618901"),
		(20000000000, "65353130", "77737706", "47863826"),
	];
	let sha1 = Totp::new(secret(SHA1_KEY), 8, Algorithm::Sha1, 30).unwrap();
	let sha256 = Totp::new(secret(SHA256_KEY), 8, Algorithm::Sha256, 30).unwrap();
	let sha512 = Totp::new(secret(SHA512_KEY), 8, Algorithm::Sha512, 30).unwrap();

	for (time, code1, code256, code512) in rows {
		assert_eq!(sha1.at(time).unwrap().to_string(), code1, "SHA1 at {time}");
		assert_eq!(sha256.at(time).unwrap().to_string(), code256, "SHA256 at {time}");
		assert_eq!(sha512.at(time).unwrap().to_string(), code512, "SHA512 at {time}");
		assert_eq!(sha1.verify_at(code1, time, 0).unwrap(), Some(0));
	}
}

#[test]
fn leading_zero_codes_keep_their_width() {
	let totp = Totp::new(secret(SHA1_KEY), 8, None, None).unwrap();
	let otp = totp.at(1111111109).unwrap();
	assert_eq!(*otp, 7081804);
	assert_eq!(otp.to_string(), "07081804");
	assert_eq!(totp.verify_at(7081804u32, 1111111109, 0).unwrap(), Some(0));
	assert_eq!(totp.verify_at("7081804", 1111111109, 0).unwrap(), Some(0));
}
