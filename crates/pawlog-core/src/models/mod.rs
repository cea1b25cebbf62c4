//! Domain models for the pawlog system.

mod care;
mod cat;
mod chat;
mod health_log;
mod symptom;

pub use care::*;
pub use cat::*;
pub use chat::*;
pub use health_log::*;
pub use symptom::*;
