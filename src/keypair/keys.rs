//! Ed25519 key pair built from decoded secret material

use super::{ConstructionError, VerifyError};
use ed25519_dalek::{
    Signature, Signer, SigningKey, Verifier, VerifyingKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH,
    SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 key pair for signing operations
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS random source
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    /// Create a key pair from a 32-byte seed
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Create a key pair from the 64-byte `secret || public` layout.
    ///
    /// Fails if the public half does not belong to the secret half.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<Self, ConstructionError> {
        let signing_key = SigningKey::from_keypair_bytes(bytes)?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Get the public key bytes
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Public key as base58, the usual address form
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.verifying_key.as_bytes()).into_string()
    }

    /// Get the secret key bytes
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Secret and public key concatenated
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Full key as base58, readable back by [`crate::decoder::decode`]
    pub fn to_base58(&self) -> Zeroizing<String> {
        let bytes = self.to_keypair_bytes();
        Zeroizing::new(bs58::encode(&bytes[..]).into_string())
    }

    /// Full key as a compact JSON byte array, e.g. `[12,200,...]`
    pub fn to_json_array(&self) -> Zeroizing<String> {
        let bytes = self.to_keypair_bytes();
        Zeroizing::new(serde_json::Value::from(&bytes[..]).to_string())
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    /// Verify a signature
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), VerifyError> {
        if signature.len() != SIGNATURE_LENGTH {
            return Err(VerifyError::InvalidLength(signature.len()));
        }
        let sig = Signature::from_slice(signature).map_err(|_| VerifyError::Mismatch)?;

        self.verifying_key
            .verify(message, &sig)
            .map_err(|_| VerifyError::Mismatch)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_base58())
            .finish_non_exhaustive()
    }
}
