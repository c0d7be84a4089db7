pub mod deepgram;

pub use deepgram::{DeepgramClient, DEFAULT_TTS_MODEL};
