//! Codec-level properties that don't belong to any one format: base64
//! byte-safety, safe-string classification, and the password-hash schemes.

use ldvi_core::codec::{
    base64_decode, base64_encode, hash_password, is_safe_string, is_safe_utf8_string, looks_prehashed, BinaryMode,
    HashKind, PasswordHasher, UnsupportedHasher,
};

#[test]
fn base64_round_trips_arbitrary_bytes() {
    for sample in [&b""[..], b"\0\x01\x02", b"hello world", &[0xffu8; 16]] {
        let encoded = base64_encode(sample);
        assert_eq!(base64_decode(&encoded).unwrap(), sample);
    }
}

#[test]
fn base64_decode_rejects_invalid_input() {
    assert!(base64_decode("not valid base64!!").is_err());
}

#[test]
fn safe_string_rejects_leading_space_colon_and_angle_bracket() {
    assert!(!is_safe_string(b" leading space"));
    assert!(!is_safe_string(b":leading colon"));
    assert!(!is_safe_string(b"<leading angle"));
    assert!(is_safe_string(b"plain value"));
}

#[test]
fn safe_string_rejects_control_bytes_and_trailing_space() {
    assert!(!is_safe_string(b"has\nnewline"));
    assert!(!is_safe_string(b"has\0nul"));
    assert!(!is_safe_string(b"trailing space "));
}

#[test]
fn safe_utf8_string_rejects_invalid_utf8() {
    assert!(!is_safe_utf8_string(&[0xff, 0xfe]));
    assert!(is_safe_utf8_string("caf\u{e9}".as_bytes()));
}

#[test]
fn empty_value_is_always_safe() {
    assert!(is_safe_string(b""));
    assert!(is_safe_utf8_string(b""));
}

struct FixedHasher;

impl PasswordHasher for FixedHasher {
    fn crypt(&self, _cleartext: &[u8]) -> Result<String, ldvi_core::error::CodecError> {
        Ok("ABabcdefghij".to_string())
    }

    fn crypt_md5(&self, _cleartext: &[u8]) -> Result<String, ldvi_core::error::CodecError> {
        Ok("$1$abcdefgh$0123456789abcdefghijklmn".to_string())
    }
}

#[test]
fn every_hash_scheme_round_trips_to_its_own_prefix() {
    let hasher = FixedHasher;
    for (kind, prefix) in [
        (HashKind::Sha, "{SHA}"),
        (HashKind::Ssha, "{SSHA}"),
        (HashKind::Md5, "{MD5}"),
        (HashKind::Smd5, "{SMD5}"),
        (HashKind::Crypt, "{CRYPT}"),
        (HashKind::CryptMd5, "{CRYPT-MD5}"),
    ] {
        let hashed = hash_password(kind, b"hunter2", &hasher).unwrap();
        assert!(hashed.starts_with(prefix.as_bytes()));
        assert!(hashed.len() > prefix.len());
        assert!(looks_prehashed(&hashed));
    }
}

#[test]
fn unsupported_hasher_fails_crypt_schemes_only() {
    let hasher = UnsupportedHasher;
    assert!(hash_password(HashKind::Sha, b"hunter2", &hasher).is_ok());
    assert!(hash_password(HashKind::Crypt, b"hunter2", &hasher).is_err());
    assert!(hash_password(HashKind::CryptMd5, b"hunter2", &hasher).is_err());
}

#[test]
fn looks_prehashed_is_false_for_cleartext() {
    assert!(!looks_prehashed(b"hunter2"));
    assert!(!looks_prehashed(b"{UNKNOWN}abc"));
}

#[test]
fn trailing_space_is_never_safe() {
    assert!(!is_safe_string(b"trailing space "));
    assert!(!is_safe_utf8_string(b"trailing space "));
}

#[test]
fn high_bit_byte_is_unsafe_in_ascii_but_may_be_safe_in_utf8() {
    let latin1_e = [0xe9u8];
    assert!(!is_safe_string(&latin1_e));
    assert!(!is_safe_utf8_string(&latin1_e)); // lone 0xe9 is not valid UTF-8
    assert!(is_safe_utf8_string("caf\u{e9}".as_bytes())); // but encoded as UTF-8 it is
    let _ = BinaryMode::Junk;
}
