pub mod client;
pub mod image;
pub mod interpret;
pub mod request;
pub mod types;
pub mod validate;

pub use client::GeminiHttpClient;
pub use image::GeminiImageClient;
pub use interpret::{interpret, FailureKind, GenerationFailure, InterpretationOutcome};
pub use request::build_request;
pub use validate::ValidationFailure;
