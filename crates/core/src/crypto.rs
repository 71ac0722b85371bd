//! AES-256-GCM encryption of tenant Provider secrets at rest.
//!
//! Ciphertext layout is `base64(nonce || ciphertext || tag)`. The key is
//! process-wide, loaded once at startup; error values never carry key
//! material or plaintext. The platform decrypts on credential resolution;
//! the CLI encrypts on tenant onboarding and secret rotation.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const NONCE_LEN: usize = 12;

/// Errors from secret encryption or decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Ciphertext is not valid base64.
    #[error("ciphertext is not valid base64")]
    Encoding,
    /// Ciphertext is shorter than a nonce plus one byte.
    #[error("ciphertext too short")]
    TooShort,
    /// The AEAD operation failed (wrong key, corrupt or tampered ciphertext).
    #[error("decryption failed")]
    Aead,
}

/// Encrypt a tenant Provider secret.
///
/// Used by the CLI when onboarding a tenant or rotating its secret.
///
/// # Errors
///
/// Returns [`CryptoError::Aead`] if the cipher rejects the input.
pub fn encrypt_secret(key: &[u8; 32], plaintext: &str) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Aead)?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(combined))
}

/// Decrypt a tenant Provider secret.
///
/// # Errors
///
/// Returns `CryptoError` on malformed encoding, truncated input, a rotated
/// or wrong key, or tampered ciphertext. The error carries no detail beyond
/// the failure class.
pub fn decrypt_secret(key: &[u8; 32], encoded: &str) -> Result<String, CryptoError> {
    let combined = STANDARD.decode(encoded).map_err(|_| CryptoError::Encoding)?;

    if combined.len() <= NONCE_LEN {
        return Err(CryptoError::TooShort);
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::Aead)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::Aead)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = [42u8; 32];
        let encrypted = encrypt_secret(&key, "sk_live_tenant_secret").unwrap();
        let decrypted = decrypt_secret(&key, &encrypted).unwrap();
        assert_eq!(decrypted, "sk_live_tenant_secret");
    }

    #[test]
    fn wrong_key_fails_decrypt() {
        let key1 = [42u8; 32];
        let key2 = [99u8; 32];
        let encrypted = encrypt_secret(&key1, "sk_live_tenant_secret").unwrap();
        assert!(matches!(
            decrypt_secret(&key2, &encrypted),
            Err(CryptoError::Aead)
        ));
    }

    #[test]
    fn garbage_base64_fails() {
        let key = [42u8; 32];
        assert!(matches!(
            decrypt_secret(&key, "%%% not base64 %%%"),
            Err(CryptoError::Encoding)
        ));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let key = [42u8; 32];
        let short = STANDARD.encode([0u8; 8]);
        assert!(matches!(
            decrypt_secret(&key, &short),
            Err(CryptoError::TooShort)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = [42u8; 32];
        let encrypted = encrypt_secret(&key, "sk_live_tenant_secret").unwrap();
        let mut bytes = STANDARD.decode(&encrypted).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xff;
        }
        let tampered = STANDARD.encode(bytes);
        assert!(matches!(
            decrypt_secret(&key, &tampered),
            Err(CryptoError::Aead)
        ));
    }
}
