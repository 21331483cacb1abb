//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep API and CLI layers decoupled from archive details.

pub mod mindmap_service;
pub mod views;
