use crate::core::domain::error::ValidationError;

const MAX_REALM_LENGTH: usize = 32;

/// A validated Proxmox authentication realm (e.g. `pam`, `pve`, or a custom LDAP/AD realm id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxRealm(String);

impl ProxmoxRealm {
    /// Realm used when none is configured.
    pub const DEFAULT: &'static str = "pam";

    /// Creates a validated realm.
    pub fn new(realm: impl Into<String>) -> Result<Self, ValidationError> {
        let realm = realm.into();
        validate_realm(&realm)?;
        Ok(Self(realm))
    }

    /// Creates a new realm without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(realm: String) -> Self {
        Self(realm)
    }

    /// Returns the realm as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProxmoxRealm {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

/// Validates a realm identifier.
///
/// PVE realm ids start with a letter and contain letters, digits, `-` and `_`.
pub(crate) fn validate_realm(realm: &str) -> Result<(), ValidationError> {
    if realm.is_empty() {
        return Err(ValidationError::Field {
            field: "realm".to_string(),
            message: "Realm cannot be empty".to_string(),
        });
    }

    if realm.len() > MAX_REALM_LENGTH {
        return Err(ValidationError::Format(format!(
            "Realm length must not exceed {} characters",
            MAX_REALM_LENGTH
        )));
    }

    if !realm.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(ValidationError::Format(
            "Realm must start with a letter".to_string(),
        ));
    }

    if !realm
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::Format(
            "Realm contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
