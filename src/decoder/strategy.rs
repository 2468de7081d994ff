//! Textual encodings a secret key may arrive in

use std::fmt;

/// One recognized encoding of secret key material.
///
/// Strategies are tried in the order of [`DecodeStrategy::ORDER`]; the first
/// one that yields a non-empty buffer wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeStrategy {
    /// Bitcoin-alphabet base58 string
    Base58,

    /// JSON array of integers in `0..=255`, e.g. `[1,2,3]`
    JsonByteArray,
}

impl DecodeStrategy {
    /// Fixed evaluation order
    pub const ORDER: [DecodeStrategy; 2] = [DecodeStrategy::Base58, DecodeStrategy::JsonByteArray];

    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DecodeStrategy::Base58 => "base58",
            DecodeStrategy::JsonByteArray => "json-byte-array",
        }
    }

    /// Run this strategy against `raw`.
    ///
    /// Codec errors are collapsed into [`RejectionReason::Malformed`]: both
    /// `bs58` and `serde_json` quote offending input in their messages.
    pub(crate) fn attempt(&self, raw: &str) -> Result<Vec<u8>, RejectionReason> {
        let bytes = match self {
            DecodeStrategy::Base58 => bs58::decode(raw)
                .into_vec()
                .map_err(|_| RejectionReason::Malformed)?,
            DecodeStrategy::JsonByteArray => {
                serde_json::from_str::<Vec<u8>>(raw).map_err(|_| RejectionReason::Malformed)?
            }
        };

        if bytes.is_empty() {
            return Err(RejectionReason::Empty);
        }
        Ok(bytes)
    }
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a strategy did not match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Decoded cleanly but produced zero bytes
    Empty,

    /// Not valid for this encoding
    Malformed,
}

/// A strategy that was tried and did not match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyRejection {
    pub strategy: DecodeStrategy,
    pub reason: RejectionReason,
}

impl fmt::Display for StrategyRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            RejectionReason::Empty => "empty",
            RejectionReason::Malformed => "malformed",
        };
        write!(f, "{}: {}", self.strategy, reason)
    }
}
