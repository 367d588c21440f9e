//! Error types and handling for the Wander Lens Tours site

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the site
#[derive(Error, Debug)]
pub enum WanderLensError {
    /// One or more required form fields were left blank
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingField { fields: Vec<String> },

    /// The email field does not look like `local@domain.tld`
    #[error("Invalid email address: {email:?}")]
    InvalidEmail { email: String },

    /// The gallery source directory is missing or unreadable
    #[error("Directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors other than the form rules above
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A referenced catalog entry or carousel does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl WanderLensError {
    /// Create a new missing-field error
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingField {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a new invalid-email error
    pub fn invalid_email<S: Into<String>>(email: S) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    /// Create a new directory-unavailable error
    pub fn directory_unavailable<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True when the gallery directory simply does not exist
    #[must_use]
    pub fn is_missing_directory(&self) -> bool {
        matches!(
            self,
            Self::DirectoryUnavailable { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// True for the two errors a visitor can fix by editing the form
    #[must_use]
    pub fn is_form_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidEmail { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WanderLensError::MissingField { .. } => {
                "Please fill in all required fields.".to_string()
            }
            WanderLensError::InvalidEmail { .. } => {
                "Please enter a valid email address.".to_string()
            }
            WanderLensError::DirectoryUnavailable { .. } => {
                "The gallery is currently unavailable.".to_string()
            }
            WanderLensError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WanderLensError::Validation { message } => format!("Invalid input: {message}"),
            WanderLensError::NotFound { message } => format!("Not found: {message}"),
        }
    }
}
