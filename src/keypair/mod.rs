//! Key Pair Module - Turning decoded bytes into a signing key pair
//!
//! Construction sits behind [`KeyPairConstructor`] so the loader can be driven
//! by any key backend; [`Ed25519Constructor`] is the one shipped here.

mod keys;

pub use keys::KeyPair;

use crate::decoder::DecodedKeyBytes;
use ed25519_dalek::{KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: &'static str, actual: usize },

    #[error("Invalid key material: {0}")]
    InvalidKey(#[from] ed25519_dalek::SignatureError),

    #[error("Key rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Invalid signature length: {0}")]
    InvalidLength(usize),

    #[error("Signature verification failed")]
    Mismatch,
}

/// Builds a key pair from validated secret bytes.
///
/// Rejections are returned as-is to the caller; the loader never rewrites
/// them into a decode failure.
pub trait KeyPairConstructor {
    type KeyPair;

    fn construct(&self, bytes: &DecodedKeyBytes) -> Result<Self::KeyPair, ConstructionError>;
}

impl<C: KeyPairConstructor + ?Sized> KeyPairConstructor for &C {
    type KeyPair = C::KeyPair;

    fn construct(&self, bytes: &DecodedKeyBytes) -> Result<Self::KeyPair, ConstructionError> {
        (**self).construct(bytes)
    }
}

/// Ed25519 constructor.
///
/// Accepts the 64-byte `secret || public` layout and, when `accept_seed` is
/// set, a bare 32-byte seed.
#[derive(Debug, Clone, Copy)]
pub struct Ed25519Constructor {
    pub accept_seed: bool,
}

impl Default for Ed25519Constructor {
    fn default() -> Self {
        Self { accept_seed: true }
    }
}

impl Ed25519Constructor {
    pub fn new(accept_seed: bool) -> Self {
        Self { accept_seed }
    }

    fn expected_lengths(&self) -> &'static str {
        if self.accept_seed {
            "32 or 64"
        } else {
            "64"
        }
    }
}

impl KeyPairConstructor for Ed25519Constructor {
    type KeyPair = KeyPair;

    fn construct(&self, bytes: &DecodedKeyBytes) -> Result<KeyPair, ConstructionError> {
        let bytes = bytes.as_bytes();

        if let Ok(full) = <&[u8; KEYPAIR_LENGTH]>::try_from(bytes) {
            return KeyPair::from_keypair_bytes(full);
        }
        if self.accept_seed {
            if let Ok(seed) = <&[u8; SECRET_KEY_LENGTH]>::try_from(bytes) {
                return Ok(KeyPair::from_seed(seed));
            }
        }

        Err(ConstructionError::InvalidLength {
            expected: self.expected_lengths(),
            actual: bytes.len(),
        })
    }
}
