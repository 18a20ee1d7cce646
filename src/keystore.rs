//! Process-wide key pair slot with exclusive-write / shared-read access.
//!
//! Deliberately an explicit store object rather than an ambient global, so
//! every test (and every embedding application) can run its own independent
//! instance. The lock guards only the slot access itself — encapsulation,
//! decapsulation, and cipher work all run on copied key material outside
//! the lock.

use std::sync::{PoisonError, RwLock};

use crate::kem::{self, KemKeyPair};

/// Holds the single active ML-KEM-768 key pair.
///
/// Writers ([`generate`](Self::generate)) are atomic with respect to
/// readers: a reader never observes the public half of one generation with
/// the secret half of another.
#[derive(Default)]
pub struct KeyPairStore {
    slot: RwLock<Option<KemKeyPair>>,
}

impl KeyPairStore {
    /// Create an empty store (no key pair yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh key pair, replacing any previous one.
    ///
    /// Anything sealed under the old pair becomes permanently
    /// undecryptable once this returns.
    pub fn generate(&self) -> KemKeyPair {
        let pair = kem::generate_keypair();
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = slot.is_some();
        *slot = Some(pair.clone());
        log::debug!("key pair generated (replaced previous: {replaced})");
        pair
    }

    /// The active pair, if one exists (copied key material).
    pub fn current(&self) -> Option<KemKeyPair> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.clone()
    }

    /// The public half only, for sharing with encapsulating parties.
    pub fn public_key(&self) -> Option<Vec<u8>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|pair| pair.public_key().to_vec())
    }

    /// Whether a key pair is currently stored.
    pub fn has_key_pair(&self) -> bool {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.is_some()
    }

    /// Return the active pair, generating one first if the slot is empty.
    ///
    /// The absent-slot check and the install of the new pair happen under
    /// one write lock, so concurrent callers agree on a single pair.
    pub fn ensure(&self) -> KemKeyPair {
        {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(pair) = slot.as_ref() {
                return pair.clone();
            }
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(pair) = slot.as_ref() {
            // Another caller won the race between our read and write locks.
            return pair.clone();
        }
        let pair = kem::generate_keypair();
        *slot = Some(pair.clone());
        log::debug!("key pair auto-provisioned on first use");
        pair
    }
}
