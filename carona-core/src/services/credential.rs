//! Credential hashing with Argon2id
//!
//! Credentials are stored in `userPasswords` as PHC strings. Entries written
//! by the web app were cleartext; those still verify and get rehashed on the
//! next successful login.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for CredentialParams {
    fn default() -> Self {
        Self {
            memory_cost: Params::DEFAULT_M_COST,
            time_cost: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl CredentialParams {
    /// Smallest parameters Argon2 accepts; only for tests and demo data
    pub fn minimal() -> Self {
        Self {
            memory_cost: Params::MIN_M_COST,
            time_cost: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

/// Hashes and verifies member passwords
#[derive(Debug, Clone, Default)]
pub struct CredentialHasher {
    params: CredentialParams,
}

impl CredentialHasher {
    pub fn new(params: CredentialParams) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| Error::Credential(format!("invalid argon2 params: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Reject passwords that are too short to store
    pub fn check_policy(password: &str) -> Result<()> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "password must have at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    /// Hash a password into a PHC string
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt_bytes: [u8; 16] = rand::thread_rng().gen();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| Error::Credential(format!("failed to encode salt: {}", e)))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::Credential(format!("failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored credential
    ///
    /// Cost parameters are read from the stored hash, so hashes made with
    /// other parameters keep verifying.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        if !is_hashed(stored) {
            return Ok(stored == password);
        }

        let parsed = PasswordHash::new(stored)
            .map_err(|e| Error::Credential(format!("corrupt credential: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Whether a stored credential is a PHC hash rather than legacy cleartext
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::new(CredentialParams::minimal());
        let hash = hasher.hash("segredo123").unwrap();

        assert!(is_hashed(&hash));
        assert_ne!(hash, "segredo123");
        assert!(hasher.verify("segredo123", &hash).unwrap());
        assert!(!hasher.verify("errada", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = CredentialHasher::new(CredentialParams::minimal());
        assert_ne!(hasher.hash("mesma").unwrap(), hasher.hash("mesma").unwrap());
    }

    #[test]
    fn test_legacy_cleartext_still_verifies() {
        let hasher = CredentialHasher::new(CredentialParams::minimal());
        assert!(hasher.verify("123456", "123456").unwrap());
        assert!(!hasher.verify("654321", "123456").unwrap());
    }

    #[test]
    fn test_password_policy() {
        assert!(CredentialHasher::check_policy("12345").is_err());
        assert!(CredentialHasher::check_policy("123456").is_ok());
    }
}
