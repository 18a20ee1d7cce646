//! Orchestration of key store, KEM, and envelope cipher into the public
//! encrypt/decrypt operations.

use crate::envelope::{self, IV_BYTES};
use crate::error::{EnvelopeError, Result};
use crate::kem;
use crate::keystore::KeyPairStore;

/// Everything a recipient needs (besides the secret key) to recover a
/// message: the sealed ciphertext, the KEM encapsulation that protects the
/// symmetric key, and the cipher IV.
///
/// The encapsulation and IV are not secret, but both must be transmitted
/// exactly as produced — losing the encapsulation makes the record
/// permanently undecryptable.
#[derive(Clone, Debug)]
pub struct EnvelopeRecord {
    /// AES-256-CBC ciphertext (multiple of 16 bytes).
    pub ciphertext: Vec<u8>,
    /// ML-KEM-768 encapsulation (1088 bytes).
    pub encapsulation: Vec<u8>,
    /// Cipher initialization vector.
    pub iv: [u8; IV_BYTES],
}

/// Hybrid encryption engine: ML-KEM-768 for key agreement, AES-256-CBC for
/// message confidentiality.
///
/// Holds a [`KeyPairStore`]; each instance manages its own key pair, so
/// tests and embedders can run several engines side by side.
#[derive(Default)]
pub struct HybridEncryptionService {
    store: KeyPairStore,
}

impl HybridEncryptionService {
    /// Create a service with an empty key store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying key pair store.
    pub fn store(&self) -> &KeyPairStore {
        &self.store
    }

    /// Return the current public key, generating a key pair first if none
    /// exists.
    ///
    /// This is the explicit form of the auto-provisioning that [`encrypt`]
    /// performs (kept for compatibility with the historical behavior of
    /// encrypting before any key generation). Call it directly when the
    /// implicit state creation inside `encrypt` is undesirable.
    ///
    /// [`encrypt`]: Self::encrypt
    pub fn ensure_key_pair(&self) -> Vec<u8> {
        self.store.ensure().public_key().to_vec()
    }

    /// Encrypt a message, auto-provisioning a key pair on first use.
    ///
    /// Encapsulates against the stored public key, then seals the message
    /// under the resulting shared secret with a fresh IV.
    pub fn encrypt(&self, message: &[u8]) -> Result<EnvelopeRecord> {
        let pair = self.store.ensure();
        let (shared_secret, encapsulation) = kem::encapsulate(pair.public_key())?;
        let (ciphertext, iv) = envelope::seal(message, &shared_secret);

        log::trace!(
            "sealed {} plaintext bytes into {} ciphertext bytes",
            message.len(),
            ciphertext.len()
        );
        Ok(EnvelopeRecord {
            ciphertext,
            encapsulation,
            iv,
        })
    }

    /// Decrypt an [`EnvelopeRecord`].
    ///
    /// Fails with [`EnvelopeError::KeyUnavailable`] when no key pair is
    /// stored; never generates one implicitly. An encapsulation produced
    /// under a different key pair decapsulates to a different secret
    /// (implicit rejection) and surfaces as
    /// [`EnvelopeError::DecryptionFailed`] from the open step.
    pub fn decrypt(&self, record: &EnvelopeRecord) -> Result<Vec<u8>> {
        let pair = self.store.current().ok_or(EnvelopeError::KeyUnavailable)?;
        let shared_secret = kem::decapsulate(pair.secret_key(), &record.encapsulation)?;
        envelope::open(&record.ciphertext, &shared_secret, &record.iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::BLOCK_BYTES;
    use crate::kem::MLKEM768_CT_BYTES;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let service = HybridEncryptionService::new();
        let record = service.encrypt(b"hello world").unwrap();
        assert_eq!(service.decrypt(&record).unwrap(), b"hello world");
    }

    #[test]
    fn test_roundtrip_empty_and_multibyte() {
        let service = HybridEncryptionService::new();
        for message in ["", "héllo wörld", "数据加密", "🔐🛡️"] {
            let record = service.encrypt(message.as_bytes()).unwrap();
            assert_eq!(service.decrypt(&record).unwrap(), message.as_bytes());
        }
    }

    #[test]
    fn test_encrypt_auto_provisions_key_pair() {
        let service = HybridEncryptionService::new();
        assert!(!service.store().has_key_pair());
        service.encrypt(b"first message").unwrap();
        assert!(service.store().has_key_pair());
    }

    #[test]
    fn test_encrypt_reuses_existing_pair() {
        let service = HybridEncryptionService::new();
        let pk = service.ensure_key_pair();
        service.encrypt(b"message").unwrap();
        assert_eq!(service.store().public_key().unwrap(), pk);
    }

    #[test]
    fn test_record_shape() {
        let service = HybridEncryptionService::new();
        let record = service.encrypt(b"hello world").unwrap();
        assert_eq!(record.encapsulation.len(), MLKEM768_CT_BYTES);
        assert_eq!(record.ciphertext.len() % BLOCK_BYTES, 0);
        assert!(!record.ciphertext.is_empty());
    }

    #[test]
    fn test_decrypt_without_key_pair_fails() {
        let encrypting = HybridEncryptionService::new();
        let record = encrypting.encrypt(b"message").unwrap();

        let fresh = HybridEncryptionService::new();
        let result = fresh.decrypt(&record);
        assert!(matches!(result, Err(EnvelopeError::KeyUnavailable)));
        // The failed decrypt must not create state.
        assert!(!fresh.store().has_key_pair());
    }

    #[test]
    fn test_flipped_ciphertext_byte_fails() {
        let service = HybridEncryptionService::new();
        let mut record = service.encrypt(b"hello world").unwrap();
        record.ciphertext[0] ^= 0x01;

        let result = service.decrypt(&record);
        assert!(matches!(result, Err(EnvelopeError::DecryptionFailed)));
    }

    #[test]
    fn test_flipped_iv_byte_fails() {
        let service = HybridEncryptionService::new();
        let mut record = service.encrypt(b"hello world").unwrap();
        record.iv[7] ^= 0x01;

        let result = service.decrypt(&record);
        assert!(matches!(result, Err(EnvelopeError::DecryptionFailed)));
    }

    #[test]
    fn test_flipped_encapsulation_byte_fails_at_open() {
        // Implicit rejection: the KEM decapsulates the mutated
        // encapsulation to a wrong secret without erroring, and the cipher
        // open step then rejects the padding.
        let service = HybridEncryptionService::new();
        let mut record = service.encrypt(b"hello world").unwrap();
        record.encapsulation[100] ^= 0x01;

        let result = service.decrypt(&record);
        assert!(matches!(result, Err(EnvelopeError::DecryptionFailed)));
    }

    #[test]
    fn test_regenerated_pair_cannot_recover_old_records() {
        // Records sealed under pair 1 run the full pipeline under pair 2
        // (decapsulation succeeds per implicit rejection) but never yield
        // the original plaintext.
        let service = HybridEncryptionService::new();
        let first_pair = service.store().generate();
        let record = service.encrypt(b"sealed under pair one").unwrap();

        service.store().generate();

        // The KEM half of the pipeline succeeds with a different secret.
        let old_secret =
            crate::kem::decapsulate(first_pair.secret_key(), &record.encapsulation).unwrap();
        let new_pair = service.store().current().unwrap();
        let new_secret =
            crate::kem::decapsulate(new_pair.secret_key(), &record.encapsulation).unwrap();
        assert!(old_secret != new_secret);

        // End to end: either the padding check rejects (overwhelmingly
        // likely) or a false-accept yields garbage — never the original.
        match service.decrypt(&record) {
            Err(EnvelopeError::DecryptionFailed) => {}
            Ok(plaintext) => assert_ne!(plaintext, b"sealed under pair one"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
