//! Language-model clients.

pub mod client;
pub mod openai;

pub use client::{Completion, GenerationParams, LLMClient, Provider};
pub use openai::OpenAIClient;
