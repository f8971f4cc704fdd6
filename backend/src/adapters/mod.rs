//! Clients for the remote AI service.
//!
//! Both adapters are built once from [`crate::config::OpenAiConfig`] and
//! handed to the handlers through the application state; neither keeps
//! per-request state.

pub mod assistant;
pub mod ocr;
pub mod openai;
