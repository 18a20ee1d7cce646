//! Hex-string boundary for the engine.
//!
//! Every byte sequence crossing this boundary is lowercase hex with no
//! separators. The request-handling layer that sits on top serializes
//! these types (hence the serde derives) and owns error-to-status mapping;
//! the core never emits key material through an error.

use serde::{Deserialize, Serialize};

use crate::envelope::IV_BYTES;
use crate::error::{EnvelopeError, Result};
use crate::service::{EnvelopeRecord, HybridEncryptionService};

/// Human-readable algorithm label reported by [`KeyInfo`].
pub const ALGORITHM_LABEL: &str = "ML-KEM-768 (Crystals-Kyber)";
/// Human-readable security level reported by [`KeyInfo`].
pub const SECURITY_LEVEL_LABEL: &str = "Post-Quantum Secure (NIST Level 3)";

/// Hex-encoded encryption result.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMessage {
    /// Sealed message, hex
    pub ciphertext: String,
    /// KEM encapsulation, hex
    pub encapsulation: String,
    /// Cipher IV, hex (32 chars)
    pub iv: String,
}

/// Hex-encoded key pair, as returned by an explicit generate request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairHex {
    /// Encapsulation key, hex (2368 chars)
    pub public_key: String,
    /// Decapsulation key, hex (4800 chars)
    pub secret_key: String,
}

/// Key pair status report.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub has_key_pair: bool,
    /// Length of the public key in hex characters (0 when absent)
    pub public_key_length: usize,
    pub algorithm: String,
    pub security_level: String,
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| EnvelopeError::MalformedInput(format!("{field}: {e}")))
}

impl HybridEncryptionService {
    /// Encrypt a UTF-8 message, returning the hex-encoded record.
    pub fn encrypt_hex(&self, message: &str) -> Result<EncryptedMessage> {
        let record = self.encrypt(message.as_bytes())?;
        Ok(EncryptedMessage {
            ciphertext: hex::encode(&record.ciphertext),
            encapsulation: hex::encode(&record.encapsulation),
            iv: hex::encode(record.iv),
        })
    }

    /// Decrypt a hex-encoded record back to UTF-8 text.
    ///
    /// Hex and IV-size failures report [`EnvelopeError::MalformedInput`];
    /// everything downstream of decapsulation collapses into
    /// [`EnvelopeError::DecryptionFailed`], including plaintext that fails
    /// UTF-8 validation (a wrong-key symptom).
    pub fn decrypt_hex(
        &self,
        ciphertext: &str,
        encapsulation: &str,
        iv: &str,
    ) -> Result<String> {
        let ciphertext = decode_hex("ciphertext", ciphertext)?;
        let encapsulation = decode_hex("encapsulation", encapsulation)?;
        let iv_bytes = decode_hex("iv", iv)?;
        let iv: [u8; IV_BYTES] = iv_bytes
            .try_into()
            .map_err(|_| EnvelopeError::MalformedInput("iv must be 16 bytes".to_string()))?;

        let record = EnvelopeRecord {
            ciphertext,
            encapsulation,
            iv,
        };
        let plaintext = self.decrypt(&record)?;
        String::from_utf8(plaintext).map_err(|_| EnvelopeError::DecryptionFailed)
    }

    /// Generate (and store) a fresh key pair, returning both halves hex-encoded.
    pub fn generate_key_pair_hex(&self) -> KeyPairHex {
        let pair = self.store().generate();
        KeyPairHex {
            public_key: hex::encode(pair.public_key()),
            secret_key: hex::encode(pair.secret_key()),
        }
    }

    /// The stored public key as hex, if a pair exists.
    pub fn public_key_hex(&self) -> Option<String> {
        self.store().public_key().map(hex::encode)
    }

    /// Status report on the stored key pair.
    pub fn key_info(&self) -> KeyInfo {
        let public_key_length = self.public_key_hex().map_or(0, |pk| pk.len());
        KeyInfo {
            has_key_pair: self.store().has_key_pair(),
            public_key_length,
            algorithm: ALGORITHM_LABEL.to_string(),
            security_level: SECURITY_LEVEL_LABEL.to_string(),
        }
    }
}
