pub mod error;
pub mod gemini;
pub mod net;

// Re-exports for convenience
pub use error::ApiError;
pub use gemini::GeminiClient;
pub use net::default_http_client;
