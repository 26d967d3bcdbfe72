//! Session-scoped generation token. Held in memory only, never persisted,
//! and attached to outbound generation requests by the generator.

use std::fmt;

use crate::errors::AppError;

#[derive(Clone, Default)]
pub struct CredentialHolder {
    token: Option<String>,
}

impl CredentialHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the token or `MissingCredential`.
    pub fn require(&self) -> Result<&str, AppError> {
        self.token().ok_or(AppError::MissingCredential)
    }
}

impl fmt::Debug for CredentialHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHolder")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Superficial shape check run before a token is accepted: non-empty and
/// carrying the provider prefix. Returns the trimmed token.
pub fn check_token_shape(raw: &str, prefix: &str) -> Result<String, AppError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(AppError::Validation(
            "Please enter your access token.".to_string(),
        ));
    }
    if !token.starts_with(prefix) {
        return Err(AppError::Validation(format!(
            "Please enter a valid access token (starts with '{prefix}')."
        )));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_starts_empty() {
        let holder = CredentialHolder::new();
        assert!(!holder.has_credential());
        assert!(matches!(holder.require(), Err(AppError::MissingCredential)));
    }

    #[test]
    fn test_set_then_require() {
        let mut holder = CredentialHolder::new();
        holder.set("hf_abc".to_string());
        assert!(holder.has_credential());
        assert_eq!(holder.require().unwrap(), "hf_abc");
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut holder = CredentialHolder::new();
        holder.set("hf_secret_value".to_string());
        let rendered = format!("{holder:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_shape_check_trims_and_accepts() {
        assert_eq!(check_token_shape("  hf_123  ", "hf_").unwrap(), "hf_123");
    }

    #[test]
    fn test_shape_check_rejects_blank_and_wrong_prefix() {
        assert!(matches!(
            check_token_shape("   ", "hf_"),
            Err(AppError::Validation(_))
        ));
        let err = check_token_shape("sk-123", "hf_").unwrap_err();
        assert!(err.to_string().contains("hf_"));
    }
}
