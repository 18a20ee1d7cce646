//! ML-KEM-768 key encapsulation (NIST FIPS 203, security level 3).
//!
//! Key sizes:
//! - Encapsulation key (public):  1184 bytes
//! - Decapsulation key (secret):  2400 bytes
//! - Encapsulation (ciphertext):  1088 bytes
//! - Shared secret:               32 bytes
//!
//! Decapsulation follows the FIPS 203 implicit-rejection design: a
//! well-formed encapsulation produced under a *different* key pair does not
//! error — it deterministically yields a different, unpredictable shared
//! secret. That is a chosen-ciphertext defense and must not be turned into
//! an error path.

use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Encoded, EncodedSizeUser, KemCore, MlKem768, MlKem768Params};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{EnvelopeError, Result};

/// ML-KEM-768 encapsulation key (public) size in bytes
pub const MLKEM768_EK_BYTES: usize = 1184;
/// ML-KEM-768 decapsulation key (secret) size in bytes
pub const MLKEM768_DK_BYTES: usize = 2400;
/// ML-KEM-768 encapsulation (ciphertext) size in bytes
pub const MLKEM768_CT_BYTES: usize = 1088;
/// Shared secret size in bytes — exactly an AES-256 key
pub const SHARED_SECRET_BYTES: usize = 32;

/// A KEM-derived shared secret.
///
/// Exists only for the duration of a single encrypt or decrypt call and is
/// zeroed when dropped. Never persisted, never encoded at the boundary.
pub struct SharedSecret([u8; SHARED_SECRET_BYTES]);

impl SharedSecret {
    pub(crate) fn from_bytes(bytes: [u8; SHARED_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw secret, sized for use as an AES-256 key.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_BYTES] {
        &self.0
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// An ML-KEM-768 key pair.
///
/// Both halves are always set together — a partial pair is not
/// representable. The secret half is zeroed on drop.
#[derive(Clone)]
pub struct KemKeyPair {
    public: Vec<u8>,
    secret: Vec<u8>,
}

impl KemKeyPair {
    /// The encapsulation key (public half), safe to share.
    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    /// The decapsulation key (secret half).
    pub fn secret_key(&self) -> &[u8] {
        &self.secret
    }
}

impl Drop for KemKeyPair {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Generate a fresh ML-KEM-768 key pair from the OS random source.
pub fn generate_keypair() -> KemKeyPair {
    let (dk, ek) = MlKem768::generate(&mut OsRng);
    KemKeyPair {
        public: ek.as_bytes().to_vec(),
        secret: dk.as_bytes().to_vec(),
    }
}

/// Encapsulate against a recipient public key.
///
/// Probabilistic: every call yields an independently random
/// (shared secret, encapsulation) pair, even for the same public key.
pub fn encapsulate(public_key: &[u8]) -> Result<(SharedSecret, Vec<u8>)> {
    if public_key.len() != MLKEM768_EK_BYTES {
        return Err(EnvelopeError::InvalidPublicKey);
    }

    let ek_encoded = Encoded::<ml_kem::kem::EncapsulationKey<MlKem768Params>>::try_from(public_key)
        .map_err(|_| EnvelopeError::InvalidPublicKey)?;
    let ek = ml_kem::kem::EncapsulationKey::<MlKem768Params>::from_bytes(&ek_encoded);

    let (ct, ss) = ek
        .encapsulate(&mut OsRng)
        .map_err(|_| EnvelopeError::InvalidPublicKey)?;

    let mut secret = [0u8; SHARED_SECRET_BYTES];
    secret.copy_from_slice(ss.as_ref());

    let ct_bytes: Vec<u8> = ct.iter().copied().collect();
    Ok((SharedSecret::from_bytes(secret), ct_bytes))
}

/// Recover the shared secret from an encapsulation.
///
/// Deterministic: for a pair produced together by [`generate_keypair`] and
/// an encapsulation from [`encapsulate`] under that pair's public key, this
/// returns the identical secret. A well-formed encapsulation from a
/// *different* pair still succeeds (implicit rejection) and yields a
/// different secret; only a wrong-length encapsulation is rejected.
pub fn decapsulate(secret_key: &[u8], encapsulation: &[u8]) -> Result<SharedSecret> {
    if secret_key.len() != MLKEM768_DK_BYTES {
        return Err(EnvelopeError::MalformedInput(format!(
            "secret key must be {} bytes, got {}",
            MLKEM768_DK_BYTES,
            secret_key.len()
        )));
    }
    if encapsulation.len() != MLKEM768_CT_BYTES {
        return Err(EnvelopeError::InvalidEncapsulation);
    }

    let dk_encoded = Encoded::<ml_kem::kem::DecapsulationKey<MlKem768Params>>::try_from(secret_key)
        .map_err(|_| EnvelopeError::MalformedInput("secret key encoding".to_string()))?;
    let dk = ml_kem::kem::DecapsulationKey::<MlKem768Params>::from_bytes(&dk_encoded);

    let ct: ml_kem::Ciphertext<MlKem768> = ml_kem::Ciphertext::<MlKem768>::try_from(encapsulation)
        .map_err(|_| EnvelopeError::InvalidEncapsulation)?;

    let ss = dk
        .decapsulate(&ct)
        .map_err(|_| EnvelopeError::InvalidEncapsulation)?;

    let mut secret = [0u8; SHARED_SECRET_BYTES];
    secret.copy_from_slice(ss.as_ref());
    Ok(SharedSecret::from_bytes(secret))
}
