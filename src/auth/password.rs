use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::{debug, error};

lazy_static! {
    /// Compared against when a login names an unknown email, so that path
    /// costs the same as a wrong password.
    static ref DUMMY_HASH: String = hash_password("not-a-real-password").unwrap_or_default();
}

/// Salted Argon2id digest in PHC string format. Accepts any input, including "".
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Never fails: a malformed or empty hash, an empty password and a mismatch
/// all yield `false`. The digest comparison itself is constant time.
pub fn compare_password(hash: &str, plain: &[u8]) -> bool {
    if hash.is_empty() || plain.is_empty() {
        return false;
    }
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "argon2 parse hash error");
            return false;
        }
    };
    Argon2::default().verify_password(plain, &parsed).is_ok()
}

/// Burn one verification against a throwaway hash. Always `false`.
pub fn compare_dummy(plain: &[u8]) -> bool {
    compare_password(&DUMMY_HASH, plain);
    false
}
