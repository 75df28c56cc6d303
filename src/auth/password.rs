/**
 * Password Hashing
 *
 * Thin wrappers around bcrypt for producing and checking password hashes.
 *
 * Hashing draws a fresh random salt on every call, so hashing the same
 * plaintext twice yields two different opaque values. Verification reads
 * the salt back out of the stored hash, so any hash ever produced here
 * keeps verifying.
 */

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a plaintext password with a per-call random salt.
///
/// # Arguments
///
/// * `plaintext` - The password to hash
///
/// # Returns
///
/// The opaque bcrypt hash string, or an error if hashing fails
pub fn hash_password(plaintext: &str) -> Result<String, BcryptError> {
    hash(plaintext, DEFAULT_COST)
}

/// Verify a candidate password against a stored hash.
///
/// The comparison at the hash-equality step is constant-time inside
/// bcrypt.
///
/// # Arguments
///
/// * `candidate` - The password presented at login
/// * `stored_hash` - The opaque hash produced by [`hash_password`]
///
/// # Returns
///
/// `true` if the candidate matches, `false` otherwise
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, BcryptError> {
    verify(candidate, stored_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("secret1").unwrap();
        let h2 = hash_password("secret1").unwrap();

        // Different salts, different opaque values
        assert_ne!(h1, h2);

        // Both still verify the original plaintext
        assert!(verify_password("secret1", &h1).unwrap());
        assert!(verify_password("secret1", &h2).unwrap());
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let h = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &h).unwrap());
    }

    #[test]
    fn test_hash_is_never_the_plaintext() {
        let h = hash_password("secret1").unwrap();
        assert_ne!(h, "secret1");
    }
}
