//! Symmetric envelope layer: AES-256-CBC with PKCS#7 padding.
//!
//! The 32-byte KEM shared secret is used directly as the AES-256 key. Every
//! [`seal`] draws a fresh random 16-byte IV; the IV travels with the
//! ciphertext and is not secret, but reuse under the same key would break
//! the mode, so there is no API for supplying one.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{EnvelopeError, Result};
use crate::kem::SharedSecret;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-CBC initialization vector size in bytes
pub const IV_BYTES: usize = 16;
/// AES block size in bytes — sealed ciphertext is always a multiple of this
pub const BLOCK_BYTES: usize = 16;

/// Encrypt `plaintext` under a KEM-derived key with a fresh random IV.
///
/// Returns the ciphertext (always a non-empty multiple of 16 bytes; an
/// empty plaintext produces one full padding block) and the IV.
pub fn seal(plaintext: &[u8], key: &SharedSecret) -> (Vec<u8>, [u8; IV_BYTES]) {
    let mut iv = [0u8; IV_BYTES];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    (ciphertext, iv)
}

/// Decrypt a sealed ciphertext.
///
/// Fails with [`EnvelopeError::DecryptionFailed`] when padding validation
/// fails after decryption — wrong key, wrong IV, and corrupted ciphertext
/// are indistinguishable through this error by design.
pub fn open(ciphertext: &[u8], key: &SharedSecret, iv: &[u8; IV_BYTES]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_BYTES != 0 {
        return Err(EnvelopeError::DecryptionFailed);
    }

    Aes256CbcDec::new(key.as_bytes().into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EnvelopeError::DecryptionFailed)
}
