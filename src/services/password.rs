//! Argon2id password hashing with the fixed cost parameters used for every
//! stored `pwd_hash`.

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};

/// Derived key length in bytes.
pub const HASH_LEN: usize = 32;
/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 512;
/// Lanes.
pub const PARALLELISM: u32 = 2;
/// Passes over memory.
pub const ITERATIONS: u32 = 2;

#[derive(Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
    params: Params,
}

impl PasswordHasher {
    pub fn new() -> Self {
        // Constants are within Argon2's bounds (m >= 8 * p, len >= 4).
        let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(HASH_LEN))
            .expect("fixed argon2 parameters are valid");
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());
        Self { argon, params }
    }

    /// Hashes `password` under a fresh random salt. The result is a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon.hash_password(password.as_bytes(), &salt)?;

        tracing::debug!("password hashed");
        Ok(hash.to_string())
    }

    /// Re-derives `password` with the fixed parameters and the salt stored in `pwd_hash`,
    /// then compares against the stored output in constant time.
    ///
    /// A mismatch is `Ok(false)`. Only a stored hash that cannot be used at all is an error.
    pub fn verify(&self, password: &str, pwd_hash: &str) -> Result<bool, password_hash::Error> {
        let parsed = PasswordHash::new(pwd_hash)?;
        let (Some(salt), Some(expected)) = (parsed.salt, parsed.hash) else {
            return Err(password_hash::Error::PhcStringField);
        };

        let derived = match self.argon.hash_password_customized(
            password.as_bytes(),
            None,
            None,
            self.params.clone(),
            salt,
        ) {
            Ok(derived) => derived,
            Err(password_hash::Error::Password) => return Ok(false),
            Err(e) => return Err(e),
        };

        let matched = derived.hash == Some(expected);
        tracing::debug!(matched, "password verified");
        Ok(matched)
    }

    /// True when `pwd_hash` was not produced with the current algorithm and parameters.
    pub fn needs_rehash(&self, pwd_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(pwd_hash) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        if parsed.hash.as_ref().map(|h| h.len()) != Some(HASH_LEN) {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(p) => {
                p.m_cost() != self.params.m_cost()
                    || p.t_cost() != self.params.t_cost()
                    || p.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}
