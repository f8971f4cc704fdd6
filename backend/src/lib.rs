//! formgen: administrative service for card templates, form schemas and
//! AI-assisted document extraction.

pub mod adapters;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
