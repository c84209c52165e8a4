pub mod token;

use tracing::error;

/// Hash a plaintext password with a per-password random salt.
///
/// # Errors
///
/// Returns an error if the hashing backend fails, never for any particular
/// plaintext.
pub fn hash_password(plaintext: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)?)
}

/// Compare a plaintext candidate against a stored hash.
///
/// A wrong password is `false`, never an error. A stored hash that cannot be
/// parsed is logged and also treated as a mismatch.
#[must_use]
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(plaintext, stored_hash) {
        Ok(matches) => matches,
        Err(err) => {
            error!("Error verifying password hash: {:?}", err);

            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_round_trip() {
        let hash = hash_password("secret1").unwrap();

        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = bcrypt::hash("secret1", 4).unwrap();
        let second = bcrypt::hash("secret1", 4).unwrap();

        assert_ne!(first, second);
        assert!(verify_password("secret1", &first));
        assert!(verify_password("secret1", &second));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("secret1", "not-a-bcrypt-hash"));
        assert!(!verify_password("secret1", ""));
    }
}
