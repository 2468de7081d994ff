//! Keypair Loader - Secret key ingestion for Ed25519 signing keys
//!
//! This crate reads a secret key supplied as text, either a base58 string or
//! a JSON array of byte values, and turns it into a signing key pair. Each
//! stage reports its own error: the value may be missing, unreadable, or
//! readable but rejected by key construction.

pub mod decoder;
pub mod keypair;
pub mod source;

use keypair::{Ed25519Constructor, KeyPair, KeyPairConstructor};
use serde::{Deserialize, Serialize};
use source::{EnvSource, SecretSource};
use thiserror::Error;
use zeroize::Zeroizing;

/// Main error type for key loading
#[derive(Error, Debug)]
pub enum KeyLoadError {
    #[error("Secret key source error: {0}")]
    MissingSource(#[from] source::SourceError),

    #[error("Invalid secret key format: {0}")]
    InvalidFormat(#[from] decoder::DecodeError),

    #[error("Key construction rejected: {0}")]
    ConstructionRejected(#[from] keypair::ConstructionError),
}

pub type Result<T> = std::result::Result<T, KeyLoadError>;

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Variable holding the secret key
    pub variable_name: String,

    /// Accept a bare 32-byte seed in addition to the 64-byte full key
    pub accept_seed: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            variable_name: source::DEFAULT_VARIABLE_NAME.to_string(),
            accept_seed: true,
        }
    }
}

/// Reads a secret key from a source, decodes it and builds a key pair
pub struct KeyLoader<S = EnvSource, C = Ed25519Constructor> {
    source: S,
    constructor: C,
    config: LoaderConfig,
}

impl KeyLoader {
    /// Loader over the process environment producing Ed25519 key pairs
    pub fn new(config: LoaderConfig) -> Self {
        let constructor = Ed25519Constructor::new(config.accept_seed);
        Self {
            source: EnvSource,
            constructor,
            config,
        }
    }
}

impl Default for KeyLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl<S: SecretSource, C: KeyPairConstructor> KeyLoader<S, C> {
    pub fn with_parts(source: S, constructor: C, config: LoaderConfig) -> Self {
        Self {
            source,
            constructor,
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the key pair from the configured variable
    pub fn load(&self) -> Result<C::KeyPair> {
        self.load_from(&self.config.variable_name)
    }

    /// Load the key pair from `variable_name`
    pub fn load_from(&self, variable_name: &str) -> Result<C::KeyPair> {
        let raw = Zeroizing::new(self.source.read(variable_name).map_err(|e| {
            tracing::warn!(variable = variable_name, "secret key not available");
            e
        })?);

        self.load_private_key(&raw).map_err(|e| {
            tracing::warn!(variable = variable_name, error = %e, "secret key rejected");
            e
        })
    }

    /// Build a key pair straight from secret key text
    pub fn load_private_key(&self, raw: &str) -> Result<C::KeyPair> {
        let bytes = decoder::decode(raw)?;
        let keypair = self.constructor.construct(&bytes)?;
        Ok(keypair)
    }
}

/// Load an Ed25519 key pair from the environment.
///
/// Reads `PRIVATE_KEY` unless another variable is named.
pub fn keypair_from_environment(variable_name: Option<&str>) -> Result<KeyPair> {
    KeyLoader::default().load_from(variable_name.unwrap_or(source::DEFAULT_VARIABLE_NAME))
}

/// Load an Ed25519 key pair from base58 or JSON byte array text
pub fn keypair_from_private_key(private_key: &str) -> Result<KeyPair> {
    KeyLoader::default().load_private_key(private_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoder::DecodedKeyBytes;
    use keypair::ConstructionError;
    use source::{MemorySource, SourceError};
    use std::sync::{Arc, Mutex};

    fn loader(source: MemorySource) -> KeyLoader<MemorySource, Ed25519Constructor> {
        KeyLoader::with_parts(source, Ed25519Constructor::default(), LoaderConfig::default())
    }

    #[test]
    fn test_base58_and_json_load_same_keypair() {
        let original = KeyPair::generate();
        let source = MemorySource::new()
            .with("PRIVATE_KEY", original.to_base58().as_str())
            .with("PRIVATE_KEY_JSON", original.to_json_array().as_str());
        let loader = loader(source);

        let from_env = loader.load().unwrap();
        let from_json = loader.load_from("PRIVATE_KEY_JSON").unwrap();
        assert_eq!(from_env.public_key_bytes(), original.public_key_bytes());
        assert_eq!(from_json.public_key_bytes(), original.public_key_bytes());

        let data = [1u8, 2, 3, 4, 5];
        let signature_from_env = from_env.sign(&data);
        let signature_from_json = from_json.sign(&data);

        assert!(from_env.verify(&data, &signature_from_json).is_ok());
        assert!(from_json.verify(&data, &signature_from_env).is_ok());
    }

    #[test]
    fn test_missing_source_is_not_a_format_error() {
        let loader = loader(MemorySource::new().with("PRIVATE_KEY", ""));

        assert!(matches!(
            loader.load(),
            Err(KeyLoadError::MissingSource(SourceError::Missing { .. }))
        ));
        assert!(matches!(
            loader.load_from("ELSEWHERE"),
            Err(KeyLoadError::MissingSource(SourceError::Missing { name })) if name == "ELSEWHERE"
        ));
    }

    #[test]
    fn test_unparseable_key() {
        let loader = loader(MemorySource::new().with("PRIVATE_KEY", "not-base58-or-json"));

        assert!(matches!(loader.load(), Err(KeyLoadError::InvalidFormat(_))));
        assert!(matches!(
            keypair_from_private_key("[1,2,300]"),
            Err(KeyLoadError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_construction_rejection_passes_through() {
        assert!(matches!(
            keypair_from_private_key("[1,2,3,4,5]"),
            Err(KeyLoadError::ConstructionRejected(ConstructionError::InvalidLength {
                actual: 5,
                ..
            }))
        ));
        assert!(matches!(
            keypair_from_private_key(&"1".repeat(64)),
            Err(KeyLoadError::ConstructionRejected(ConstructionError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_seed_only_key_respects_config() {
        let seed_key = bs58::encode([9u8; 32]).into_string();
        let source = MemorySource::new().with("SEED", seed_key.as_str());

        let lenient = KeyLoader::with_parts(
            source.clone(),
            Ed25519Constructor::new(true),
            LoaderConfig::default(),
        );
        assert_eq!(
            lenient.load_from("SEED").unwrap().public_key_bytes(),
            KeyPair::from_seed(&[9u8; 32]).public_key_bytes()
        );

        let config = LoaderConfig {
            variable_name: "SEED".into(),
            accept_seed: false,
        };
        let strict = KeyLoader::with_parts(source, Ed25519Constructor::new(config.accept_seed), config);
        assert!(matches!(
            strict.load(),
            Err(KeyLoadError::ConstructionRejected(ConstructionError::InvalidLength { .. }))
        ));
    }

    /// Records what it was handed and refuses everything
    struct RefusingConstructor {
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl KeyPairConstructor for RefusingConstructor {
        type KeyPair = ();

        fn construct(&self, bytes: &DecodedKeyBytes) -> std::result::Result<(), ConstructionError> {
            self.seen.lock().unwrap().push(bytes.as_bytes().to_vec());
            Err(ConstructionError::Rejected("point not on curve".into()))
        }
    }

    #[test]
    fn test_injected_constructor() {
        let constructor = RefusingConstructor {
            seen: Mutex::new(Vec::new()),
        };
        let loader = KeyLoader::with_parts(
            MemorySource::new().with("PRIVATE_KEY", "[4,5,6]"),
            &constructor,
            LoaderConfig::default(),
        );

        match loader.load() {
            Err(KeyLoadError::ConstructionRejected(ConstructionError::Rejected(reason))) => {
                assert_eq!(reason, "point not on curve");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // nothing reaches the constructor when decoding fails
        assert!(matches!(
            loader.load_private_key(""),
            Err(KeyLoadError::InvalidFormat(_))
        ));
        assert_eq!(*constructor.seen.lock().unwrap(), vec![vec![4u8, 5, 6]]);
    }

    #[test]
    fn test_keypair_from_environment() {
        let original = KeyPair::generate();
        std::env::set_var("KEYPAIR_LOADER_LIB_TEST_KEY", original.to_base58().as_str());

        let loaded = keypair_from_environment(Some("KEYPAIR_LOADER_LIB_TEST_KEY")).unwrap();
        assert_eq!(loaded.public_key_base58(), original.public_key_base58());

        assert!(matches!(
            keypair_from_environment(Some("KEYPAIR_LOADER_LIB_TEST_UNSET")),
            Err(KeyLoadError::MissingSource(_))
        ));
    }

    #[test]
    fn test_config_defaults_and_serde() {
        let config = LoaderConfig::default();
        assert_eq!(config.variable_name, "PRIVATE_KEY");
        assert!(config.accept_seed);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: LoaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: LoaderConfig = serde_json::from_str(r#"{"variable_name":"SOLANA_KEY"}"#).unwrap();
        assert_eq!(partial.variable_name, "SOLANA_KEY");
        assert!(partial.accept_seed);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_logs_never_contain_secret_material() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .with_writer(logs.clone())
            .finish();

        let good = KeyPair::generate();
        let good_text = good.to_base58();
        let bad_text = "[201,202,999]";
        let loader = loader(
            MemorySource::new()
                .with("GOOD", good_text.as_str())
                .with("BAD", bad_text),
        );

        tracing::subscriber::with_default(subscriber, || {
            assert!(loader.load_from("GOOD").is_ok());
            assert!(loader.load_from("BAD").is_err());
        });

        let output = logs.contents();
        assert!(output.contains("secret key decoded"));
        assert!(output.contains("secret key decode failed"));
        assert!(output.contains("BAD"));
        assert!(!output.contains(good_text.as_str()));
        assert!(!output.contains("999"));
        assert!(!output.contains("201"));
    }
}
