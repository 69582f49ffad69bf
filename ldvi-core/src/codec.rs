//! The byte-safe value codec.
//!
//! Directory attribute values are arbitrary byte strings. To carry them
//! through a text editor unharmed, both textual formats tag every value
//! with one of a small set of encodings: plain (printed as-is), base64
//! (`::`), or - native format only - backslash-quoted (`;`). This module
//! owns the encoding-independent pieces: deciding whether a value is safe
//! to print unescaped, and generating/verifying password hashes for the
//! `{SHA}`/`{SSHA}`/`{MD5}`/`{SMD5}`/`{CRYPT}`/`{CRYPT-MD5}` userPassword
//! schemes.

use base64::Engine as _;
use md5::{Digest, Md5};
use rand::RngCore;
use sha1::Sha1;

use crate::error::CodecError;

/// How liberally a printer is allowed to treat non-ASCII bytes as plain text.
///
/// Replaces a process-global "are we printing to a UTF-8 terminal" flag with
/// an explicit value threaded through the printers, so the same process can
/// print to a file (forced ASCII-only) and a pty (auto-detected) without
/// mutable global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMode {
    /// Only 7-bit-safe bytes print unescaped; anything else is base64.
    Ascii,
    /// Valid UTF-8 sequences print unescaped; invalid ones are base64.
    Utf8,
    /// Like `Utf8`, but a value need only look like probably-safe bytes -
    /// used when reading values back out of a document a human just edited
    /// by hand, where demanding strict UTF-8 would reject typos needlessly.
    Junk,
}

fn is_safe_init_byte(b: u8) -> bool {
    !matches!(b, 0x00 | b'\n' | b'\r' | b' ' | b':' | b'<') && b < 0x80
}

fn is_safe_byte(b: u8) -> bool {
    !matches!(b, 0x00 | b'\n' | b'\r') && b < 0x80
}

/// True if `value` can be printed as a plain 7-bit-safe string: empty, or
/// first byte not space/colon/less-than, last byte not space, no NUL/LF/CR
/// or high-bit byte anywhere in between.
pub fn is_safe_string(value: &[u8]) -> bool {
    match value.split_first() {
        None => true,
        Some((&first, rest)) => {
            is_safe_init_byte(first) && rest.iter().all(|&b| is_safe_byte(b)) && *value.last().unwrap() != b' '
        }
    }
}

/// True if `value` is empty, or doesn't start with space/colon/less-than,
/// doesn't end with a space, contains no NUL/LF/CR, and is valid UTF-8 (so
/// high-bit bytes are allowed as long as they form well-formed multi-byte
/// sequences).
pub fn is_safe_utf8_string(value: &[u8]) -> bool {
    if value.is_empty() {
        return true;
    }
    if matches!(value[0], 0x00 | b'\n' | b'\r' | b' ' | b':' | b'<') {
        return false;
    }
    if *value.last().unwrap() == b' ' {
        return false;
    }
    if value.iter().any(|&b| b == 0x00 || b == b'\n' || b == b'\r') {
        return false;
    }
    std::str::from_utf8(value).is_ok()
}

/// Whether `value` may be printed unescaped under the given mode.
pub fn is_safe_under(value: &[u8], mode: BinaryMode) -> bool {
    match mode {
        BinaryMode::Ascii => is_safe_string(value),
        BinaryMode::Utf8 => is_safe_utf8_string(value),
        BinaryMode::Junk => {
            value.is_empty()
                || (!matches!(value[0], 0x00 | b'\n' | b'\r' | b' ' | b':' | b'<')
                    && *value.last().unwrap() != b' '
                    && !value.iter().any(|&b| b == 0x00 || b == b'\n' || b == b'\r'))
        }
    }
}

pub fn base64_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn base64_decode(s: &str) -> Result<Vec<u8>, CodecError> {
    base64::engine::general_purpose::STANDARD
        .decode(s.trim_end())
        .map_err(|_| CodecError::InvalidBase64)
}

/// One of the userPassword hash schemes ldvi knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Sha,
    Ssha,
    Md5,
    Smd5,
    Crypt,
    CryptMd5,
}

impl HashKind {
    pub fn scheme_name(self) -> &'static str {
        match self {
            HashKind::Sha => "SHA",
            HashKind::Ssha => "SSHA",
            HashKind::Md5 => "MD5",
            HashKind::Smd5 => "SMD5",
            HashKind::Crypt => "CRYPT",
            HashKind::CryptMd5 => "CRYPT-MD5",
        }
    }

    /// Parses a `{SCHEME}` prefix, case-insensitively, as ldapsearch/slapd do.
    pub fn from_scheme_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_uppercase().as_str() {
            "SHA" => HashKind::Sha,
            "SSHA" => HashKind::Ssha,
            "MD5" => HashKind::Md5,
            "SMD5" => HashKind::Smd5,
            "CRYPT" => HashKind::Crypt,
            "CRYPT-MD5" | "CRYPTMD5" => HashKind::CryptMd5,
            _ => return None,
        })
    }
}

const SALT_LEN: usize = 4;

/// Generates the salt bytes used by the salted schemes. Broken out so tests
/// can supply a fixed salt and assert the exact encoded hash.
fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Crypt(3)-family hashing is platform/libc-specific, unlike the portable
/// SHA/MD5 schemes above. Isolated behind a trait so the core crate stays
/// pure Rust; the binary supplies a real implementation backed by a system
/// crypt(3) call, and tests can supply a fake one.
pub trait PasswordHasher {
    fn crypt(&self, cleartext: &[u8]) -> Result<String, CodecError>;
    fn crypt_md5(&self, cleartext: &[u8]) -> Result<String, CodecError>;
}

/// A [`PasswordHasher`] that always fails, for callers that never intend to
/// generate `{CRYPT}`/`{CRYPT-MD5}` passwords (e.g. library tests).
pub struct UnsupportedHasher;

impl PasswordHasher for UnsupportedHasher {
    fn crypt(&self, _cleartext: &[u8]) -> Result<String, CodecError> {
        Err(CodecError::UnsupportedHash("CRYPT"))
    }

    fn crypt_md5(&self, _cleartext: &[u8]) -> Result<String, CodecError> {
        Err(CodecError::UnsupportedHash("CRYPT-MD5"))
    }
}

/// Hashes `cleartext` under the given scheme, returning the full
/// `{SCHEME}...` value ready to store as userPassword.
pub fn hash_password(
    kind: HashKind,
    cleartext: &[u8],
    hasher: &dyn PasswordHasher,
) -> Result<Vec<u8>, CodecError> {
    let rendered = match kind {
        HashKind::Sha => {
            let mut h = Sha1::new();
            h.update(cleartext);
            format!("{{SHA}}{}", base64_encode(&h.finalize()))
        }
        HashKind::Ssha => {
            let salt = random_salt();
            let mut h = Sha1::new();
            h.update(cleartext);
            h.update(salt);
            let mut digest = h.finalize().to_vec();
            digest.extend_from_slice(&salt);
            format!("{{SSHA}}{}", base64_encode(&digest))
        }
        HashKind::Md5 => {
            let mut h = Md5::new();
            h.update(cleartext);
            format!("{{MD5}}{}", base64_encode(&h.finalize()))
        }
        HashKind::Smd5 => {
            let salt = random_salt();
            let mut h = Md5::new();
            h.update(cleartext);
            h.update(salt);
            let mut digest = h.finalize().to_vec();
            digest.extend_from_slice(&salt);
            format!("{{SMD5}}{}", base64_encode(&digest))
        }
        HashKind::Crypt => format!("{{CRYPT}}{}", hasher.crypt(cleartext)?),
        HashKind::CryptMd5 => format!("{{CRYPT-MD5}}{}", hasher.crypt_md5(cleartext)?),
    };
    Ok(rendered.into_bytes())
}

/// If `value` already carries a recognized `{SCHEME}` prefix it is assumed to
/// already be hashed and is returned unchanged; callers only invoke
/// [`hash_password`] for values that fail this check.
pub fn looks_prehashed(value: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(value) else { return false };
    let Some(end) = text.find('}') else { return false };
    if !text.starts_with('{') {
        return false;
    }
    HashKind::from_scheme_name(&text[1..end]).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_string_rejects_leading_space_and_colon() {
        assert!(!is_safe_string(b" leading space"));
        assert!(!is_safe_string(b":leading colon"));
        assert!(!is_safe_string(b"<leading angle"));
        assert!(is_safe_string(b"plain value"));
    }

    #[test]
    fn safe_string_rejects_high_bit_bytes() {
        assert!(!is_safe_string("caf\u{e9}".as_bytes()));
    }

    #[test]
    fn safe_string_rejects_trailing_space_but_allows_empty() {
        assert!(!is_safe_string(b"trailing space "));
        assert!(is_safe_string(b""));
    }

    #[test]
    fn safe_utf8_string_accepts_valid_utf8() {
        assert!(is_safe_utf8_string("caf\u{e9}".as_bytes()));
        assert!(!is_safe_utf8_string(&[0x80, 0x81]));
    }

    #[test]
    fn sha_hash_matches_known_vector() {
        let hashed = hash_password(HashKind::Sha, b"secret", &UnsupportedHasher).unwrap();
        assert_eq!(hashed, b"{SHA}5en6G6MezRroT3XKqkdPOmY/BfQ=".to_vec());
    }

    #[test]
    fn md5_hash_matches_known_vector() {
        let hashed = hash_password(HashKind::Md5, b"secret", &UnsupportedHasher).unwrap();
        assert_eq!(hashed, b"{MD5}Xr4ilOzQ4PCOq3aQ0qbuaQ==".to_vec());
    }

    #[test]
    fn ssha_hash_round_trips_through_base64() {
        let hashed = hash_password(HashKind::Ssha, b"secret", &UnsupportedHasher).unwrap();
        let text = std::str::from_utf8(&hashed).unwrap();
        let decoded = base64_decode(text.strip_prefix("{SSHA}").unwrap()).unwrap();
        assert_eq!(decoded.len(), 20 + SALT_LEN);
    }

    #[test]
    fn looks_prehashed_detects_known_schemes() {
        assert!(looks_prehashed(b"{SSHA}abcd"));
        assert!(looks_prehashed(b"{crypt}abcd"));
        assert!(!looks_prehashed(b"plaintext"));
        assert!(!looks_prehashed(b"{BOGUS}abcd"));
    }
}
