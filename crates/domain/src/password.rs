use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::validation::{MessageCatalog, RuleSet, ValidationError, ValidationFailure};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Plaintext password as submitted. Never serialized; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;
    pub const MAX_LENGTH: usize = 1000;
    const FIELD: &'static str = "Password";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let failures = Self::check(Self::FIELD, &value, &MessageCatalog::default());
        match ValidationError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Self(value)),
        }
    }

    pub fn check(field: &str, value: &str, catalog: &MessageCatalog) -> Vec<ValidationFailure> {
        RuleSet::new(field, catalog)
            .not_empty(value)
            .min_length(value, Self::MIN_LENGTH)
            .max_length(value, Self::MAX_LENGTH)
            .into_failures()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// PBKDF2-HMAC-SHA256 digest plus its salt, both base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    hash: String,
    salt: String,
}

impl PasswordHash {
    pub const ITERATIONS: u32 = 100_000;
    pub const HASH_BYTES: usize = 32;
    pub const SALT_BYTES: usize = 16;
    pub const HASH_MAX_LENGTH: usize = 54;
    pub const SALT_MAX_LENGTH: usize = 34;

    /// Derives a hash with a fresh random salt. CPU heavy; run it off the
    /// async executor.
    pub fn derive(password: &Password) -> Self {
        let mut salt = [0u8; Self::SALT_BYTES];
        OsRng.fill_bytes(&mut salt);
        let digest = Self::digest(password, &salt);
        Self { hash: STANDARD.encode(digest), salt: STANDARD.encode(salt) }
    }

    /// Rebuilds from stored strings. Only emptiness and length are checked.
    pub fn from_parts(hash: impl Into<String>, salt: impl Into<String>) -> Result<Self, ValidationError> {
        let (hash, salt) = (hash.into(), salt.into());
        let catalog = MessageCatalog::default();
        let mut failures = RuleSet::new("Hash", &catalog)
            .not_empty(&hash)
            .max_length(&hash, Self::HASH_MAX_LENGTH)
            .into_failures();
        failures.extend(
            RuleSet::new("Salt", &catalog)
                .not_empty(&salt)
                .max_length(&salt, Self::SALT_MAX_LENGTH)
                .into_failures(),
        );
        match ValidationError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(Self { hash, salt }),
        }
    }

    /// Recomputes the digest with the stored salt and compares.
    pub fn verify(&self, password: &Password) -> bool {
        let Ok(salt) = STANDARD.decode(&self.salt) else {
            return false;
        };
        let Ok(expected) = STANDARD.decode(&self.hash) else {
            return false;
        };
        let actual = Self::digest(password, &salt);
        expected.as_slice().ct_eq(&actual).into()
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    fn digest(password: &Password, salt: &[u8]) -> [u8; Self::HASH_BYTES] {
        let mut out = [0u8; Self::HASH_BYTES];
        pbkdf2_hmac::<Sha256>(password.expose().as_bytes(), salt, Self::ITERATIONS, &mut out);
        out
    }
}
