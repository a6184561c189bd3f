pub mod openai_transcription_repository;
pub mod openai_translation_repository;
pub mod openai_tts_repository;
pub mod transcription_repository;
pub mod translation_repository;
pub mod tts_repository;
pub mod user_repository;
pub mod user_state_store;

pub use openai_transcription_repository::OpenAiTranscriptionRepository;
pub use openai_translation_repository::OpenAiTranslationRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use transcription_repository::TranscriptionRepository;
pub use translation_repository::TranslationRepository;
pub use tts_repository::{TtsRepository, VoiceParams};
pub use user_repository::UserRepository;
pub use user_state_store::UserStateStore;
