use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Invalid login credentials (HTTP {status})")]
    Authentication { status: StatusCode, body: String },

    #[error("Not logged in to the portal")]
    NotLoggedIn,

    #[error("'start' date can't be after 'end' date: {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Anti-forgery token not found in login page (selector `{selector}`)")]
    CsrfTokenNotFound { selector: String },

    #[error("No premises found for account {account}")]
    NoPremises { account: String },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Request,
    Network,
    Data,
    Configuration,
}

impl PortalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortalError::Authentication { .. }
            | PortalError::NotLoggedIn
            | PortalError::CsrfTokenNotFound { .. } => ErrorCategory::Authentication,
            PortalError::InvalidRange { .. } => ErrorCategory::Request,
            PortalError::Transport(_) | PortalError::Io(_) => ErrorCategory::Network,
            PortalError::NoPremises { .. } | PortalError::Decode(_) => ErrorCategory::Data,
            PortalError::ConfigValidation { .. }
            | PortalError::InvalidConfigValue { .. }
            | PortalError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status of the failed authenticated call, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PortalError::Authentication { status, .. } => Some(*status),
            PortalError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Authentication => {
                format!("Login error. Check credentials and account number ({})", self)
            }
            ErrorCategory::Request => format!("Invalid request: {}", self),
            ErrorCategory::Network => format!("Could not reach the portal: {}", self),
            ErrorCategory::Data => format!("Unexpected portal response: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
