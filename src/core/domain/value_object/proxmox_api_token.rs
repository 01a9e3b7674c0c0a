use crate::core::domain::error::ValidationError;
use std::fmt;

/// A Proxmox API token, usually `USER@REALM!TOKENID=SECRET`.
///
/// The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxmoxApiToken(String);

impl ProxmoxApiToken {
    /// Creates a validated token.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        validate_api_token(&token)?;
        Ok(Self(token))
    }

    /// Creates a new token without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the token as the value of the `Authorization` header.
    #[must_use]
    pub fn as_authorization_header(&self) -> String {
        format!("PVEAPIToken={}", self.0)
    }
}

impl fmt::Debug for ProxmoxApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keep the token id visible, hide the secret
        let id = self.0.split('=').next().unwrap_or_default();
        f.debug_tuple("ProxmoxApiToken")
            .field(&format_args!("{}=***", id))
            .finish()
    }
}

/// Validates an API token string.
pub(crate) fn validate_api_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::Field {
            field: "api_token".to_string(),
            message: "No API token provided".to_string(),
        });
    }
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::Format(
            "API token cannot contain whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}
