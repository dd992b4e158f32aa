//! Core error presentation shared by the CLI.
//!
//! - [`ErrorContext`] - error message with optional details and suggestion
//! - [`user_friendly_error`] - convert any error chain to an [`ErrorContext`]

pub mod error;

pub use error::{ErrorContext, user_friendly_error};
