use crate::error::{TokenError, TokenResult};

/// Connected-app signing credentials for a single Tableau site.
///
/// Treated as immutable once constructed; callers that want live reloads
/// build a fresh value per issuance instead of mutating this one.
#[derive(Clone)]
pub struct SigningCredentials {
    /// Connected-app client id, becomes the `iss` claim.
    pub client_id: String,
    /// Secret id, attached as the `kid` header when present.
    pub secret_id: Option<String>,
    /// Shared secret used as the HMAC-SHA256 signing key.
    pub secret_value: String,
    /// Site GUID the token grants access to.
    pub site_id: String,
    /// Origin serving the embedding script, e.g. `https://prod-in-a.online.tableau.com`.
    pub host: Option<String>,
}

impl SigningCredentials {
    /// Check the fields signing cannot proceed without.
    pub fn validate(&self) -> TokenResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::MissingCredential("client_id"));
        }
        if self.secret_value.trim().is_empty() {
            return Err(TokenError::MissingCredential("secret_value"));
        }
        if self.site_id.trim().is_empty() {
            return Err(TokenError::MissingCredential("site_id"));
        }
        Ok(())
    }

    /// Signing key bytes. Secrets copied out of the vendor UI often carry a
    /// trailing newline, so surrounding whitespace is stripped.
    pub(crate) fn signing_key(&self) -> &[u8] {
        self.secret_value.trim().as_bytes()
    }

    /// Key id for the token header, if one is configured.
    pub(crate) fn key_id(&self) -> Option<&str> {
        self.secret_id
            .as_deref()
            .map(str::trim)
            .filter(|kid| !kid.is_empty())
    }
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("client_id", &self.client_id)
            .field("secret_id", &self.secret_id)
            .field("secret_value", &"***redacted***")
            .field("site_id", &self.site_id)
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SigningCredentials {
        SigningCredentials {
            client_id: "client-abc".to_string(),
            secret_id: Some("secret-kid".to_string()),
            secret_value: "super-secret".to_string(),
            site_id: "9fafe5e9-4a92-4e3e-9b53-0123456789ab".to_string(),
            host: None,
        }
    }

    #[test]
    fn validate_accepts_complete_credentials() {
        assert!(credentials().validate().is_ok());
    }

    #[test]
    fn validate_rejects_each_required_field_independently() {
        let mut missing_client = credentials();
        missing_client.client_id = String::new();
        assert!(matches!(
            missing_client.validate(),
            Err(TokenError::MissingCredential("client_id"))
        ));

        let mut missing_secret = credentials();
        missing_secret.secret_value = "   ".to_string();
        assert!(matches!(
            missing_secret.validate(),
            Err(TokenError::MissingCredential("secret_value"))
        ));

        let mut missing_site = credentials();
        missing_site.site_id = String::new();
        assert!(matches!(
            missing_site.validate(),
            Err(TokenError::MissingCredential("site_id"))
        ));
    }

    #[test]
    fn signing_key_strips_whitespace() {
        let mut padded = credentials();
        padded.secret_value = "  super-secret\n".to_string();
        assert_eq!(padded.signing_key(), b"super-secret");
    }

    #[test]
    fn key_id_ignores_blank_secret_id() {
        let mut blank = credentials();
        blank.secret_id = Some("  ".to_string());
        assert_eq!(blank.key_id(), None);
        assert_eq!(credentials().key_id(), Some("secret-kid"));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("redacted"));
    }
}
