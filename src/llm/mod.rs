pub mod gemini;
pub mod mock;
pub mod r#trait;

pub use gemini::GeminiClient;
pub use mock::MockGenerator;
pub use r#trait::{GenerationParams, TextGenerator};
