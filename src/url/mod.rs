//! URL handling module
//!
//! This module turns the operator's raw multi-line input into the ordered
//! list of URLs a batch will audit.

mod validator;

// Re-export main functions
pub use validator::{is_absolute_url, validate_urls, UrlValidation, ValidationWarning};
