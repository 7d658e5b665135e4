//! Utility functions for code generation and URL processing.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - URL validation and sanitization

pub mod code_generator;
pub mod url_validator;
