pub mod backend;
pub mod whisper_api;

pub use backend::TranscriptionBackend;
pub use whisper_api::WhisperApiBackend;
