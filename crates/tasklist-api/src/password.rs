use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid password salt: {0}")]
    Salt(argon2::password_hash::Error),

    #[error("invalid hashing parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Argon2id with a server-wide salt. The same password always yields the
/// same PHC string, so sign-in can look the account up by
/// `(username, password_hash)`.
pub struct SaltedHasher {
    argon2: Argon2<'static>,
    salt: SaltString,
}

impl SaltedHasher {
    /// Default Argon2id cost parameters.
    pub fn new(salt: &str) -> Result<Self, HashError> {
        Self::with_params(salt, Params::default())
    }

    pub fn with_params(salt: &str, params: Params) -> Result<Self, HashError> {
        let salt = SaltString::encode_b64(salt.as_bytes()).map_err(HashError::Salt)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            salt,
        })
    }

    /// Cheapest parameters Argon2 accepts. Only for tests.
    pub fn fast(salt: &str) -> Result<Self, HashError> {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .map_err(HashError::Params)?;
        Self::with_params(salt, params)
    }

    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &self.salt)
            .map_err(HashError::Hash)?;
        Ok(hash.to_string())
    }
}
