//! Saved-password encryption.
//!
//! Passwords remembered for a connection profile are sealed with AES-256-GCM
//! before they reach the SQLite cache. The master key comes from
//! `SCHEMADOC_MASTER_KEY` (base64, 32 bytes); without it a random key is
//! generated for the life of the process and stored passwords from earlier
//! runs cannot be opened.
//!
//! # Example
//!
//! ```rust
//! use schemadoc::crypto::MasterKey;
//!
//! let key = MasterKey::generate().unwrap();
//! let sealed = key.seal("hunter2").unwrap();
//! assert_eq!(key.open(&sealed).unwrap(), "hunter2");
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// The length of an AES-256 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Environment variable holding the base64 master key.
pub const MASTER_KEY_ENV: &str = "SCHEMADOC_MASTER_KEY";

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed")]
    EncryptionFailed,

    /// Wrong key or tampered data.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid key length: expected {KEY_LENGTH} bytes")]
    InvalidKeyLength,

    #[error("invalid ciphertext")]
    InvalidCiphertext,

    #[error("random number generator failed")]
    RandomFailed,
}

/// An AES-256 master key.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    bytes: [u8; KEY_LENGTH],
    persistent: bool,
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

impl MasterKey {
    /// Generate a random, ephemeral key.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| CryptoError::RandomFailed)?;
        Ok(Self {
            bytes,
            persistent: false,
        })
    }

    /// Decode a base64 key. Decoded keys count as persistent.
    pub fn decode(encoded: &str) -> CryptoResult<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        let bytes: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self {
            bytes,
            persistent: true,
        })
    }

    /// Base64 form, suitable for `SCHEMADOC_MASTER_KEY`.
    pub fn encode(&self) -> String {
        BASE64.encode(self.bytes)
    }

    /// Key from `SCHEMADOC_MASTER_KEY`, else a fresh ephemeral key.
    pub fn from_env() -> CryptoResult<Self> {
        match std::env::var(MASTER_KEY_ENV) {
            Ok(encoded) => match Self::decode(&encoded) {
                Ok(key) => Ok(key),
                Err(e) => {
                    tracing::warn!(error = %e, "invalid {MASTER_KEY_ENV}, using an ephemeral key");
                    Self::generate()
                }
            },
            Err(_) => {
                tracing::debug!("{MASTER_KEY_ENV} not set, using an ephemeral key");
                Self::generate()
            }
        }
    }

    /// Whether the key survives a restart (came from the environment).
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn aead_key(&self) -> CryptoResult<LessSafeKey> {
        let unbound =
            UnboundKey::new(&AES_256_GCM, &self.bytes).map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(LessSafeKey::new(unbound))
    }

    /// Encrypt a secret. Output is base64 of `nonce || ciphertext || tag`.
    pub fn seal(&self, plaintext: &str) -> CryptoResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        SystemRandom::new()
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.aead_key()?
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(&sealed))
    }

    /// Decrypt a value produced by [`MasterKey::seal`].
    pub fn open(&self, sealed: &str) -> CryptoResult<String> {
        let data = BASE64
            .decode(sealed)
            .map_err(|_| CryptoError::InvalidCiphertext)?;
        if data.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CryptoError::InvalidCiphertext);
        }

        let (nonce_bytes, encrypted) = data.split_at(NONCE_LEN);
        let nonce_array: [u8; NONCE_LEN] = nonce_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidCiphertext)?;

        let mut in_out = encrypted.to_vec();
        let plaintext = self
            .aead_key()?
            .open_in_place(
                Nonce::assume_unique_for_key(nonce_array),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::InvalidCiphertext)
    }
}
