use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// hash_password
///
/// Produces a salted argon2id hash in PHC string format, suitable for the
/// `users.password_hash` column. A fresh random salt is drawn per call.
pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// verify_password
///
/// Checks a candidate password against a stored PHC hash. Returns Ok(false)
/// for a well-formed hash that does not match; Err only when the stored hash
/// itself is malformed.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
