//! Password Hashing
//!
//! PBKDF2-HMAC-SHA256. Stored form is `pbkdf2-sha256$iterations$salt$hex`,
//! so the work factor can be raised without invalidating older hashes.

use crate::AuthError;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use uuid::Uuid;

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Algorithm tag in the stored form
const SCHEME: &str = "pbkdf2-sha256";

/// Iterations used for new hashes
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const KEY_LEN: usize = 32;

fn derive(password: &str, salt: &str, iterations: u32) -> String {
    let mut output = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut output);
    output.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    hash_with_iterations(password, PBKDF2_ITERATIONS)
}

fn hash_with_iterations(password: &str, iterations: u32) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        salt,
        derive(password, &salt, iterations)
    )
}

/// Check a password against a stored hash.
///
/// Returns `Hashing` for a stored value that is not in the expected form.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let malformed = |reason: &str| AuthError::Hashing(format!("stored hash {}", reason));

    let mut parts = stored.splitn(4, '$');
    let (scheme, iterations, salt, expected) =
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(iterations), Some(salt), Some(expected)) => {
                (scheme, iterations, salt, expected)
            }
            _ => return Err(malformed("has too few fields")),
        };

    if scheme != SCHEME {
        return Err(malformed("uses an unknown scheme"));
    }
    let iterations: u32 = iterations
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| malformed("has a bad iteration count"))?;

    let actual = derive(password, salt, iterations);
    if actual.len() != expected.len() {
        return Ok(false);
    }
    // Compare every byte regardless of where the first mismatch is
    let diff = actual
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    Ok(diff == 0)
}
