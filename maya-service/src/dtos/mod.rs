pub mod relay;

pub use relay::{ChatResponse, ChatStatusResponse, GeminiResponse};
