//! Deterministic cache keys.
//!
//! A fingerprint is a blake3 digest over length-prefixed fields, so no two
//! different field layouts can produce the same byte stream.

use crate::domain::language::LanguageCode;
use std::fmt;

/// Which remote operation a cached value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Translate,
    Speech,
}

impl OperationKind {
    fn tag(&self) -> &'static str {
        match self {
            OperationKind::Translate => "translate",
            OperationKind::Speech => "speech",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Request parameters that take part in the key besides the payload
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintParams<'a> {
    pub source: Option<LanguageCode>,
    pub targets: &'a [LanguageCode],
    pub model: &'a str,
    pub voice: Option<&'a str>,
    pub speed: Option<f32>,
}

/// Derive the cache key for an operation. Pure and total.
pub fn fingerprint(kind: OperationKind, payload: &str, params: &FingerprintParams<'_>) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();

    write_field(&mut hasher, kind.tag().as_bytes());
    write_field(&mut hasher, normalize_payload(payload).as_bytes());
    write_field(
        &mut hasher,
        params.source.map(|s| s.as_str()).unwrap_or("").as_bytes(),
    );

    let mut targets: Vec<&str> = params.targets.iter().map(|t| t.as_str()).collect();
    targets.sort_unstable();
    targets.dedup();
    write_field(&mut hasher, targets.join(",").as_bytes());

    write_field(&mut hasher, params.model.as_bytes());
    write_field(&mut hasher, params.voice.unwrap_or("").as_bytes());
    match params.speed {
        Some(speed) => write_field(&mut hasher, &speed.to_bits().to_le_bytes()),
        None => write_field(&mut hasher, &[]),
    }

    Fingerprint(*hasher.finalize().as_bytes())
}

/// Trim and collapse runs of whitespace into a single space
pub fn normalize_payload(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn write_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
