//! Generative-model gateway for Pawlog.
//!
//! Builds prompts from cat profiles, health logs and chat history, calls a
//! Gemini `generateContent` endpoint, and parses the JSON reply strictly into
//! typed payloads. Every failure degrades to a fixed English or Korean fallback.

pub mod client;
pub mod config;
pub mod extraction;
pub mod gateway;
pub mod language;
pub mod prompts;

pub use client::{GeminiClient, GenerativeModel, LlmError};
pub use config::GatewayConfig;
pub use extraction::*;
pub use gateway::*;
pub use language::Language;
pub use prompts::*;
