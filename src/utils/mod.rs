//! Utility functions used across the application.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - URL validation for shortening requests
//! - [`short_url`] - Public short URL construction from config or request headers
//! - [`db_error`] - SQLx error classification

pub mod code_generator;
pub mod db_error;
pub mod short_url;
pub mod url_validator;
