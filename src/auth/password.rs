//! Credential hashing. Stored hashes are argon2id PHC strings
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`): the parameters and the
//! random per-call salt travel inside the string, so hashing one password twice
//! gives two different strings that both verify.

use anyhow::Context;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

/// argon2id v1.3 with the crate's recommended cost parameters.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2: {e}"))
        .context("hashing password")?;
    Ok(phc.to_string())
}

/// `Ok(false)` only for a genuine mismatch. A stored hash that does not parse,
/// or that argon2 cannot evaluate, is an error.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| anyhow::anyhow!("argon2: {e}"))
        .context("stored password hash is not a PHC string")?;
    // parameters come from the PHC string, not from `hasher()`
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("argon2: {e}")).context("verifying password"),
    }
}
