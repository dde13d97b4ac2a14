//! Unified error handling with Sentry integration.
//!
//! The library modules each own a narrow error type; `AppError` gathers them
//! for the binary, which reports failures through [`AppError::report`].

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::models::ModelError;
use crate::terminal::TerminalError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The web-larek API request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A model rejected an operation.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A terminal command could not be understood.
    #[error("{0}")]
    Terminal(#[from] TerminalError),
}

impl AppError {
    /// Whether the failure is on our side or upstream, as opposed to bad
    /// user input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Io(_) | Self::Config(_))
    }

    /// Log the error and capture server-side failures to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected input");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of commands
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}
