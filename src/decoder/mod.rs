//! Decoder Module - Secret key ingestion from ambiguous text
//!
//! A secret key may be supplied either as a base58 string or as a JSON array
//! of byte values. [`decode`] tries each encoding in a fixed order and hands
//! back the raw bytes for key construction. Nothing here checks curve-specific
//! lengths; that is the constructor's job.

mod strategy;

pub use strategy::{DecodeStrategy, RejectionReason, StrategyRejection};

use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("secret key is neither base58 nor a JSON byte array ({})", summarize(.rejected))]
    InvalidFormat { rejected: Vec<StrategyRejection> },
}

fn summarize(rejected: &[StrategyRejection]) -> String {
    rejected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a single [`decode`] call
pub type DecodeOutcome = Result<DecodedKeyBytes, DecodeError>;

/// Secret key bytes produced by a successful decode.
///
/// Never empty. The buffer is wiped when dropped and never shows up in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedKeyBytes {
    bytes: Zeroizing<Vec<u8>>,
    strategy: DecodeStrategy,
}

impl DecodedKeyBytes {
    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Which encoding the bytes were read from
    pub fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }
}

impl AsRef<[u8]> for DecodedKeyBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for DecodedKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecodedKeyBytes({}, [REDACTED; {}])",
            self.strategy,
            self.bytes.len()
        )
    }
}

/// Decode a secret key given as base58 or as a JSON byte array.
///
/// Base58 is tried first; its failure is not an error on its own. A strategy
/// producing zero bytes counts as no match, so `""` and `"[]"` are both
/// [`DecodeError::InvalidFormat`].
pub fn decode(raw: &str) -> DecodeOutcome {
    let mut rejected = Vec::with_capacity(DecodeStrategy::ORDER.len());

    for strategy in DecodeStrategy::ORDER {
        match strategy.attempt(raw) {
            Ok(bytes) => {
                tracing::debug!(strategy = strategy.name(), "secret key decoded");
                return Ok(DecodedKeyBytes {
                    bytes: Zeroizing::new(bytes),
                    strategy,
                });
            }
            Err(reason) => rejected.push(StrategyRejection { strategy, reason }),
        }
    }

    tracing::warn!("secret key decode failed");
    Err(DecodeError::InvalidFormat { rejected })
}
