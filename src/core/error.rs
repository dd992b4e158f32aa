//! User-facing error presentation.
//!
//! Library components return typed `thiserror` errors
//! ([`ParseError`](crate::catalog::ParseError),
//! [`InstallError`](crate::installer::InstallError),
//! [`UpdateFailure`](crate::engine::UpdateFailure)); the CLI layer wraps
//! them in [`anyhow::Error`] with context. At the top, [`user_friendly_error`]
//! walks the error chain, finds the typed cause, and turns it into an
//! [`ErrorContext`] with details and an actionable suggestion.
//!
//! ```rust,no_run
//! use chromedriver_sync::core::user_friendly_error;
//!
//! fn report(result: anyhow::Result<()>) {
//!     if let Err(e) = result {
//!         user_friendly_error(e).display();
//!     }
//! }
//! ```

use crate::catalog::ParseError;
use crate::constants::CATALOG_URL;
use crate::engine::{UpdateError, UpdateFailure};
use crate::installer::InstallError;
use colored::Colorize;
use std::fmt;

/// An error message with optional details and a suggestion for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// One-line description of what went wrong.
    pub error: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] for display.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(failure) = current.downcast_ref::<UpdateFailure>() {
            return update_failure_context(failure);
        }
        if let Some(install) = current.downcast_ref::<InstallError>() {
            return install_error_context(install);
        }
        if let Some(parse) = current.downcast_ref::<ParseError>() {
            return parse_error_context(parse);
        }
        if let Some(http) = current.downcast_ref::<reqwest::Error>() {
            return network_error_context(&error, http);
        }
        if let Some(io) = current.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::PermissionDenied {
                return ErrorContext::new(error.to_string())
                    .with_details(format!("{error:#}"))
                    .with_suggestion(
                        "Check permissions or choose another directory with --target-dir",
                    );
            }
        }

        match current.source() {
            Some(source) => current = source,
            None => break,
        }
    }

    let context = ErrorContext::new(error.to_string());
    if error.chain().count() > 1 { context.with_details(format!("{error:#}")) } else { context }
}

fn update_failure_context(failure: &UpdateFailure) -> ErrorContext {
    let mut context = match &failure.error {
        UpdateError::Install(install) => install_error_context(install),
        UpdateError::CatalogUnavailable { .. } => ErrorContext::new(failure.error.to_string())
            .with_suggestion(format!(
                "The Chrome for Testing page may have changed or be unreachable; check {CATALOG_URL}"
            )),
        UpdateError::NoDownloadForPlatform { platform, .. } => {
            ErrorContext::new(failure.error.to_string()).with_suggestion(format!(
                "Check the platform id (currently '{platform}'); valid ids include win64, win32, linux64, mac-x64 and mac-arm64"
            ))
        }
    };

    let versions = format!(
        "local version: {}, stable version: {}",
        failure.local_version.as_deref().unwrap_or("not installed"),
        failure.target_version.as_deref().unwrap_or("unknown")
    );
    context.details = Some(match context.details.take() {
        Some(details) => format!("{details}\n{versions}"),
        None => versions,
    });
    context
}

fn install_error_context(error: &InstallError) -> ErrorContext {
    let context = ErrorContext::new(error.to_string());
    match error {
        InstallError::FetchFailed { url, .. } | InstallError::HttpError { url, .. } => context
            .with_suggestion(format!(
                "Check your network connection, or download the archive manually from {url}"
            )),
        InstallError::ExtractFailed { .. } => context.with_suggestion(format!(
            "The download may be corrupt; run again or download it manually from {CATALOG_URL}"
        )),
        InstallError::SourceMissing { .. } => context.with_suggestion(
            "The archive layout did not match the platform; check --platform",
        ),
        InstallError::TargetNotFile { .. } => context.with_suggestion(
            "Remove or rename that directory, or pick another --target-dir",
        ),
        InstallError::BackupMissing { .. } => {
            context.with_suggestion("A backup is only created when an update replaces a driver")
        }
        InstallError::Io { source, .. } => {
            let context = context.with_details(source.to_string());
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                context.with_suggestion(
                    "Check directory permissions, or close programs still running chromedriver",
                )
            } else {
                context.with_suggestion("Check the destination directory and free disk space")
            }
        }
    }
}

fn parse_error_context(error: &ParseError) -> ErrorContext {
    ErrorContext::new(error.to_string())
        .with_suggestion(format!("Open {CATALOG_URL} in a browser to check the page is available"))
}

fn network_error_context(error: &anyhow::Error, http: &reqwest::Error) -> ErrorContext {
    let suggestion = if http.is_timeout() {
        "The server did not answer in time; check your connection and try again"
    } else {
        "Check your network connection or proxy settings"
    };
    ErrorContext::new(error.to_string()).with_details(http.to_string()).with_suggestion(suggestion)
}
