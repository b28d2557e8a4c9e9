//! Per-field encryption at rest.
//!
//! Uses ChaCha20-Poly1305 for authenticated encryption. Each field is sealed
//! independently into a self-contained token, so stored columns carry no
//! cross-field coupling.

use crate::errors::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};

/// Nonce length prepended to every token.
const NONCE_LEN: usize = 12;

/// Symmetric cipher for individual record fields.
///
/// `open(seal(s))` returns `s` exactly under the same key; a different key
/// fails authentication rather than yielding garbage.
pub struct FieldCipher {
    cipher: ChaCha20Poly1305,
}

impl FieldCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(key.into()),
        }
    }

    /// Encrypt one field value into a base64 token of nonce followed by
    /// ciphertext. A fresh random nonce is drawn per call, so sealing the
    /// same value twice yields different tokens.
    pub fn seal(&self, plaintext: &str) -> Result<String, AppError> {
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AppError::InternalError("Failed to encrypt field".to_string()))?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(nonce.as_slice());
        token.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(token))
    }

    /// Decrypt a token produced by [`seal`](Self::seal).
    #[allow(dead_code)]
    pub fn open(&self, token: &str) -> Result<String, AppError> {
        let bytes = BASE64
            .decode(token)
            .map_err(|e| AppError::InternalError(format!("Invalid field token: {}", e)))?;
        if bytes.len() < NONCE_LEN {
            return Err(AppError::InternalError(
                "Field token too short".to_string(),
            ));
        }

        let nonce = Nonce::from_slice(&bytes[..NONCE_LEN]);
        let plaintext = self
            .cipher
            .decrypt(nonce, &bytes[NONCE_LEN..])
            .map_err(|_| {
                AppError::InternalError("Failed to decrypt field - wrong key?".to_string())
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| AppError::InternalError(format!("Decrypted field not UTF-8: {}", e)))
    }
}

/// Generate a random 32-byte key.
pub fn generate_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut key);
    key
}

/// Interpret a configured key value: 64 hex chars decode to the raw 32-byte
/// key, anything else is treated as a passphrase and hashed down to 32 bytes.
pub fn key_from_config(value: &str) -> [u8; 32] {
    if value.len() == 64 {
        if let Ok(raw) = hex::decode(value) {
            let mut key = [0u8; 32];
            key.copy_from_slice(&raw);
            return key;
        }
    }
    derive_key(value)
}

/// Derive a 32-byte key from a passphrase via SHA-256.
pub fn derive_key(passphrase: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    let result = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&result);
    key
}
