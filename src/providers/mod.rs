pub mod deepgram;
pub mod gemini;
pub mod traits;
pub mod utils;

pub use deepgram::DeepgramClient;
pub use gemini::GeminiProvider;
pub use traits::{CompletionProvider, ImageInput, SpeechError, SpeechProvider, Transcript};
