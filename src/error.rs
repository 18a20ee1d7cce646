use thiserror::Error;

/// Failure taxonomy for the hybrid encryption engine.
///
/// Every operation returns one of these typed failures to its immediate
/// caller; nothing is retried internally and nothing panics. The
/// request-handling layer that consumes this crate owns the mapping to
/// user-visible messages.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Public key bytes do not parse as an ML-KEM-768 encapsulation key.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Encapsulation bytes are not a valid ML-KEM-768 ciphertext length.
    #[error("Invalid encapsulation")]
    InvalidEncapsulation,

    /// Decrypt was attempted while no key pair is stored.
    #[error("No key pair available — generate one first")]
    KeyUnavailable,

    /// Symmetric open failed after decryption.
    ///
    /// Deliberately carries no detail: wrong key, wrong IV, corrupted
    /// ciphertext, and cross-key decapsulation all collapse into this one
    /// category so callers cannot be used as a padding oracle.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Input failed to parse before any cryptographic work ran
    /// (hex decoding, wrong-size IV, wrong-size key material).
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_failed_reveals_nothing() {
        // The message must be the same regardless of the underlying cause.
        let msg = EnvelopeError::DecryptionFailed.to_string();
        assert_eq!(msg, "Decryption failed");
        assert!(!msg.to_lowercase().contains("padding"));
        assert!(!msg.to_lowercase().contains("key"));
    }

    #[test]
    fn test_malformed_input_carries_context() {
        let err = EnvelopeError::MalformedInput("iv must be 16 bytes".to_string());
        assert!(err.to_string().contains("iv must be 16 bytes"));
    }
}
