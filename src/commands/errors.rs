//! # Command Error Handling
//!
//! This module provides error handling utilities for pulsarctl commands
//! using the handled crate for consistent error property extraction.

use handled::Handle;

use crate::errors::CtlError;
use crate::namespace::NamespaceNameParseError;

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Implements Handle<UserError> for itself to allow extraction
impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

impl Handle<UserError> for NamespaceNameParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some(
                "Namespace names look like 'tenant/namespace' and may only use letters, digits and -=:._"
                    .to_string(),
            ),
        })
    }
}

fn status_hint(status: u16) -> Option<String> {
    let hint = match status {
        400 => "Invalid request. Check the arguments and flag values.",
        401 => "Authentication required. Pass --auth-token or set auth_token in the config file.",
        403 => "Access forbidden. The role behind the token lacks permission for this operation.",
        404 => "The resource was not found. Check the name and the service URL.",
        405 => "The service does not support this operation. It may be disabled or too old.",
        409 => "The resource was modified concurrently. Fetch it again and retry.",
        412 => "A precondition failed on the service side.",
        500..=599 => "Server error. The service may be temporarily unavailable.",
        _ => return None,
    };
    Some(hint.to_string())
}

impl Handle<UserError> for CtlError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self {
            CtlError::InvalidName(err) => return err.handle(),
            CtlError::InvalidArgument(_) | CtlError::Flags(_) => {
                Some("Run the command with --help to see its usage.".to_string())
            }
            CtlError::UnknownCommand { .. } => {
                Some("Run 'pulsarctl help' to list the available commands.".to_string())
            }
            CtlError::Transport(err) if err.is_connect() => Some(
                "Could not connect. Check --admin-service-url / --bookie-service-url.".to_string(),
            ),
            CtlError::Transport(err) if err.is_timeout() => {
                Some("The request timed out. The service may be overloaded.".to_string())
            }
            CtlError::Config(_) | CtlError::Url(_) => {
                Some("Check the config file and the service URL flags.".to_string())
            }
            _ => self.status().and_then(status_hint),
        };
        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}

/// Helper function to extract user-friendly error messages
pub fn extract_user_error<E>(error: &E) -> Option<UserError>
where
    E: Handle<UserError>,
{
    error.handle()
}

/// Enhanced error formatting for CLI output
///
/// Causes that the message does not already mention are appended, so a
/// refused connection ends with "Connection refused (os error 111)".
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::error::Error,
{
    let (mut message, hint) = match error.handle() {
        Some(user_error) => (user_error.message, user_error.usage_hint),
        None => (error.to_string(), None),
    };
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    let mut output = format!("[✖]  {}", message);
    if let Some(hint) = hint {
        output.push_str(&format!("\nHint: {}", hint));
    }
    output
}
