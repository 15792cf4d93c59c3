pub mod assistant;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod gemini;
pub mod image_processing;
pub mod mcp_server;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod tools;
pub mod url_validation;
pub mod web_pages;

pub use assistant::CreativeAssistant;
pub use error::{MuseError, MuseResult};
