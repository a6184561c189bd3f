pub mod fingerprint;
pub mod response_cache;

pub use fingerprint::{fingerprint, Fingerprint, FingerprintParams, OperationKind};
pub use response_cache::{CacheEntry, ResponseCache};

/// Translated text keyed by (text, source, target, model)
pub type TranslationCache = ResponseCache<String>;

/// Synthesized audio keyed by (text, language, voice parameters)
pub type SpeechCache = ResponseCache<Vec<u8>>;
