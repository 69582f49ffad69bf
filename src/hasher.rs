//! The one real [`ldvi_core::codec::PasswordHasher`] implementation: `{CRYPT}`
//! and `{CRYPT-MD5}` go through the platform's own `crypt(3)`, the same way
//! the teacher keeps anything FFI/platform-specific behind a small wrapper
//! (`bch_bindgen::c`, `wrappers::format`) rather than spread through the
//! core. `ldvi-core` stays pure Rust and never links libc directly.

use std::ffi::{CStr, CString};

use ldvi_core::codec::PasswordHasher;
use ldvi_core::error::CodecError;
use rand::Rng as _;

const SALT_CHARS: &[u8] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn random_salt_chars(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

/// Calls `crypt(3)` through libc, the standard Unix password-hashing
/// syscall-adjacent library function. Not thread-safe upstream (the glibc
/// implementation keeps static state), so calls are serialized behind a
/// process-wide mutex.
pub struct SystemHasher;

fn call_crypt(cleartext: &[u8], salt: &str) -> Result<String, CodecError> {
    static CRYPT_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    let _guard = CRYPT_LOCK.lock().map_err(|_| CodecError::HashFailed("crypt lock poisoned".to_string()))?;

    let key = CString::new(cleartext).map_err(|_| CodecError::HashFailed("password contains a NUL byte".to_string()))?;
    let salt = CString::new(salt).map_err(|_| CodecError::HashFailed("salt contains a NUL byte".to_string()))?;

    let out = unsafe { libc::crypt(key.as_ptr(), salt.as_ptr()) };
    if out.is_null() {
        return Err(CodecError::HashFailed("crypt(3) returned NULL".to_string()));
    }
    let hashed = unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned();
    Ok(hashed)
}

impl PasswordHasher for SystemHasher {
    fn crypt(&self, cleartext: &[u8]) -> Result<String, CodecError> {
        let salt = random_salt_chars(2);
        call_crypt(cleartext, &salt)
    }

    fn crypt_md5(&self, cleartext: &[u8]) -> Result<String, CodecError> {
        let salt = format!("$1${}$", random_salt_chars(8));
        call_crypt(cleartext, &salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypt_round_trips_through_libc() {
        let hasher = SystemHasher;
        let hashed = hasher.crypt(b"secret").unwrap();
        assert_eq!(unsafe { CStr::from_ptr(libc::crypt(
            CString::new("secret").unwrap().as_ptr(),
            CString::new(hashed.as_str()).unwrap().as_ptr(),
        )) }.to_string_lossy(), hashed);
    }
}
