//! Model plugins backed by a local Ollama server.

pub mod ollama;
pub mod resolver;
