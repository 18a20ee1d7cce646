//! # pq-envelope
//!
//! **Hybrid post-quantum envelope encryption: ML-KEM-768 + AES-256-CBC.**
//!
//! A single-process encryption engine that protects arbitrary messages with
//! a post-quantum Key Encapsulation Mechanism. Each message is sealed under
//! a fresh KEM-derived shared secret, so only the encapsulation (not the
//! symmetric key) ever travels with the ciphertext:
//!
//! - **Key agreement**: ML-KEM-768 (NIST FIPS 203, security level 3) via
//!   the RustCrypto `ml-kem` crate
//! - **Message confidentiality**: AES-256-CBC with PKCS#7 padding and a
//!   fresh random 16-byte IV per message
//!
//! ## Quick Start
//!
//! ```rust
//! use pq_envelope::HybridEncryptionService;
//!
//! let service = HybridEncryptionService::new();
//!
//! // Auto-provisions a key pair on first use
//! let record = service.encrypt(b"attack at dawn").unwrap();
//! let plaintext = service.decrypt(&record).unwrap();
//! assert_eq!(plaintext, b"attack at dawn");
//!
//! // Hex boundary for transport layers
//! let encrypted = service.encrypt_hex("hello world").unwrap();
//! let decrypted = service
//!     .decrypt_hex(&encrypted.ciphertext, &encrypted.encapsulation, &encrypted.iv)
//!     .unwrap();
//! assert_eq!(decrypted, "hello world");
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`kem`] | ML-KEM-768 key generation, encapsulation, decapsulation |
//! | [`envelope`] | AES-256-CBC seal/open under a KEM shared secret |
//! | [`keystore`] | Lock-guarded slot for the single active key pair |
//! | [`service`] | Encrypt/decrypt orchestration and key lifecycle guards |
//! | [`api`] | Hex-string boundary and key status reporting |
//! | [`error`] | Typed failure taxonomy |
//!
//! ## Security notes
//!
//! - Shared secrets and secret keys are zeroed on drop.
//! - Decapsulation of a mismatched encapsulation does **not** error; per
//!   the FIPS 203 implicit-rejection design it yields a different,
//!   unpredictable secret, and the failure surfaces as a generic
//!   [`EnvelopeError::DecryptionFailed`] at the cipher-open step.
//! - Regenerating the key pair makes every record sealed under the old
//!   pair permanently undecryptable.
//! - This crate does not provide key persistence, rotation policy, or
//!   transport security; those belong to the embedding application.

// ── Public modules ──────────────────────────────────────────────────────────

/// Hex-string boundary types and service methods.
pub mod api;

/// Symmetric envelope layer (AES-256-CBC, PKCS#7, random IV).
pub mod envelope;

/// Failure taxonomy.
pub mod error;

/// ML-KEM-768 key encapsulation mechanism.
pub mod kem;

/// Key pair lifecycle and shared-read/exclusive-write storage.
pub mod keystore;

/// Encrypt/decrypt orchestration.
pub mod service;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use api::{EncryptedMessage, KeyInfo, KeyPairHex, ALGORITHM_LABEL, SECURITY_LEVEL_LABEL};
pub use envelope::{BLOCK_BYTES, IV_BYTES};
pub use error::{EnvelopeError, Result};
pub use kem::{
    KemKeyPair, SharedSecret, MLKEM768_CT_BYTES, MLKEM768_DK_BYTES, MLKEM768_EK_BYTES,
    SHARED_SECRET_BYTES,
};
pub use keystore::KeyPairStore;
pub use service::{EnvelopeRecord, HybridEncryptionService};

// ── Library metadata ────────────────────────────────────────────────────────

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert!(version().contains('.'));
    }

    #[test]
    fn test_full_pipeline_smoke() {
        let service = HybridEncryptionService::new();
        let record = service.encrypt(b"smoke test").unwrap();
        assert_eq!(record.encapsulation.len(), MLKEM768_CT_BYTES);
        assert_eq!(service.decrypt(&record).unwrap(), b"smoke test");
    }
}
