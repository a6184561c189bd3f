//! User-facing reply texts

use crate::domain::language::LanguageCode;

pub const TRANSLATION_FAILED: &str = "❌ Translation failed. Please try again.";
pub const TRANSCRIPTION_FAILED: &str =
    "❌ Could not transcribe audio. Please try again with clearer speech.";
pub const ACCESS_DISABLED: &str =
    "Access disabled. Contact support if you believe this is an error.";
pub const EMPTY_MESSAGE: &str = "Please send a non-empty message.";
pub const EMPTY_AUDIO: &str = "Please send a non-empty voice message.";

pub fn translation_message(language: LanguageCode, translation: &str) -> String {
    format!("{} {}:\n{}", language.flag(), language.name(), translation)
}

pub fn translation_unavailable(language: LanguageCode) -> String {
    format!(
        "⚠️ {} {}: translation unavailable right now. Please try again later.",
        language.flag(),
        language.name()
    )
}

pub fn unsupported_language() -> String {
    let samples: Vec<String> = LanguageCode::ALL
        .iter()
        .map(|language| {
            format!(
                "{} {}: \"{}\"",
                language.flag(),
                language.name(),
                language.sample_phrase()
            )
        })
        .collect();

    format!(
        "❌ Language not supported or couldn't be detected.\n\nSupported languages:\n{}",
        samples.join("\n")
    )
}

pub fn text_too_long(length: usize, max: usize) -> String {
    format!(
        "❌ Text too long ({} characters). Maximum allowed: {} characters.",
        length, max
    )
}

pub fn audio_too_large(size: usize, max: usize) -> String {
    format!(
        "❌ Audio too large ({} bytes). Maximum allowed: {} bytes.",
        size, max
    )
}

/// Echo of a transcribed voice message, cut to `max_chars` characters
pub fn transcription_echo(source: LanguageCode, text: &str, max_chars: usize) -> String {
    format!(
        "🎤 {} Transcribed ({}):\n{}",
        source.flag(),
        source.name(),
        truncate(text, max_chars)
    )
}

pub fn voice_caption(language: LanguageCode) -> String {
    format!("{} {}", language.flag(), language.name())
}

pub fn voice_reply_too_long(language: LanguageCode) -> String {
    format!(
        "🎤 {} Voice reply in {} is too long.",
        language.flag(),
        language.name()
    )
}

pub fn voice_reply_failed(language: LanguageCode) -> String {
    format!("🎤 Could not create a voice reply in {}.", language.name())
}

pub fn too_many_messages(limit: u32) -> String {
    format!("⚠️ Too many messages. Limit: {} per minute. Please slow down.", limit)
}

pub fn too_many_voice_messages(limit: u32) -> String {
    format!(
        "⚠️ Too many voice messages. Limit: {} per hour. Please wait before sending more voice messages.",
        limit
    )
}

/// Cut to at most `max_chars` characters, ending in "..." when shortened
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
