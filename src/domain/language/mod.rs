use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// ISO 639-1 language codes the relay translates between
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "th")]
    Thai,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "vi")]
    Vietnamese,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::Russian,
        LanguageCode::English,
        LanguageCode::Thai,
        LanguageCode::Japanese,
        LanguageCode::Korean,
        LanguageCode::Vietnamese,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Russian => "ru",
            LanguageCode::English => "en",
            LanguageCode::Thai => "th",
            LanguageCode::Japanese => "ja",
            LanguageCode::Korean => "ko",
            LanguageCode::Vietnamese => "vi",
        }
    }

    /// English display name, also used in translation prompts
    pub fn name(&self) -> &'static str {
        match self {
            LanguageCode::Russian => "Russian",
            LanguageCode::English => "English",
            LanguageCode::Thai => "Thai",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Korean => "Korean",
            LanguageCode::Vietnamese => "Vietnamese",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            LanguageCode::Russian => "🇷🇺",
            LanguageCode::English => "🇺🇸",
            LanguageCode::Thai => "🇹🇭",
            LanguageCode::Japanese => "🇯🇵",
            LanguageCode::Korean => "🇰🇷",
            LanguageCode::Vietnamese => "🇻🇳",
        }
    }

    /// A short greeting used to show users what each language looks like
    pub fn sample_phrase(&self) -> &'static str {
        match self {
            LanguageCode::Russian => "Привет, как дела?",
            LanguageCode::English => "Hello, how are you?",
            LanguageCode::Thai => "สวัสดี เป็นอย่างไรบ้าง",
            LanguageCode::Japanese => "こんにちは、元気ですか？",
            LanguageCode::Korean => "안녕하세요, 어떻게 지내세요?",
            LanguageCode::Vietnamese => "Xin chào, bạn khỏe không?",
        }
    }

    /// Every supported language
    pub fn all() -> BTreeSet<LanguageCode> {
        Self::ALL.into_iter().collect()
    }

    /// Convert lingua Language to LanguageCode.
    ///
    /// Ukrainian, Bulgarian, Macedonian and Serbian are routinely confused
    /// with Russian on short chat messages, so they are folded into it.
    pub fn from_lingua(language: Language) -> Option<Self> {
        #[allow(unreachable_patterns)]
        match language {
            Language::Russian
            | Language::Ukrainian
            | Language::Bulgarian
            | Language::Macedonian
            | Language::Serbian => Some(LanguageCode::Russian),
            Language::English => Some(LanguageCode::English),
            Language::Thai => Some(LanguageCode::Thai),
            Language::Japanese => Some(LanguageCode::Japanese),
            Language::Korean => Some(LanguageCode::Korean),
            Language::Vietnamese => Some(LanguageCode::Vietnamese),
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        LanguageCode::ALL
            .into_iter()
            .find(|language| language.as_str() == code)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

/// Black-box source language detection
pub trait LanguageDetection: Send + Sync {
    /// Returns `None` when the text is not in a supported language or
    /// detection is not confident enough to pick one.
    fn detect(&self, text: &str) -> Option<LanguageCode>;
}

/// Languages the lingua detector is built with
const DETECTABLE: [Language; 10] = [
    Language::Russian,
    Language::English,
    Language::Thai,
    Language::Japanese,
    Language::Korean,
    Language::Vietnamese,
    Language::Ukrainian,
    Language::Bulgarian,
    Language::Macedonian,
    Language::Serbian,
];

/// Statistical detector backed by lingua, restricted to the supported languages
pub struct LinguaDetector {
    detector: LanguageDetector,
}

impl LinguaDetector {
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_languages(&DETECTABLE).build(),
        }
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetection for LinguaDetector {
    fn detect(&self, text: &str) -> Option<LanguageCode> {
        match self.detector.detect_language_of(text) {
            Some(language) => LanguageCode::from_lingua(language),
            None => {
                tracing::debug!(text_length = text.len(), "Could not detect language");
                None
            }
        }
    }
}
