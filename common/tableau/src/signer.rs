use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;
use uuid::Uuid;

use crate::claims::{EmbedClaims, SiteClaim, AUDIENCE, EMBED_SCOPE};
use crate::credentials::SigningCredentials;
use crate::error::{TokenError, TokenResult};

/// Default token lifetime in seconds.
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// A freshly signed embed token.
///
/// `token` is the opaque deliverable; `expires_at` is carried alongside for
/// logging and assertions. Held only long enough to be embedded in a URL or
/// returned in a response body.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mint a connected-app token impersonating `subject`.
///
/// Captures the wall clock once, so every call produces a fresh `jti` and
/// expiry; tokens are never cached or reused across calls. Fails before any
/// signing when the credentials are missing a required field or
/// `ttl_seconds` is not positive; signing failures from the JWT library are
/// surfaced as-is.
pub fn issue(
    credentials: &SigningCredentials,
    subject: &str,
    ttl_seconds: i64,
) -> TokenResult<IssuedToken> {
    credentials.validate()?;
    if ttl_seconds <= 0 {
        return Err(TokenError::InvalidTtl(ttl_seconds));
    }

    let now = Utc::now();
    let expires_at = now + Duration::seconds(ttl_seconds);

    let claims = EmbedClaims {
        iss: credentials.client_id.clone(),
        sub: subject.to_string(),
        aud: AUDIENCE.to_string(),
        // Anchored to issuance time; the suffix keeps two tokens minted
        // within the same second distinct.
        jti: format!("{}-{}", now.timestamp(), Uuid::new_v4()),
        exp: expires_at.timestamp(),
        site: SiteClaim {
            id: credentials.site_id.clone(),
        },
        scp: vec![EMBED_SCOPE.to_string()],
    };

    let mut header = Header::new(Algorithm::HS256);
    header.kid = credentials.key_id().map(str::to_string);

    let token = encode(
        &header,
        &claims,
        &EncodingKey::from_secret(credentials.signing_key()),
    )?;
    debug!(sub = %claims.sub, exp = claims.exp, "issued embed token");

    Ok(IssuedToken { token, expires_at })
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

    use super::*;

    const SECRET: &str = "0aW5nLXNlY3JldC12YWx1ZQ==";

    fn credentials() -> SigningCredentials {
        SigningCredentials {
            client_id: "client-abc".to_string(),
            secret_id: Some("secret-kid".to_string()),
            secret_value: SECRET.to_string(),
            site_id: "9fafe5e9-4a92-4e3e-9b53-0123456789ab".to_string(),
            host: Some("https://prod-in-a.online.tableau.com".to_string()),
        }
    }

    fn decode_claims(token: &str) -> EmbedClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        decode::<EmbedClaims>(
            token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .expect("decode token")
        .claims
    }

    #[test]
    fn expiry_tracks_ttl_from_issuance() {
        let before = Utc::now().timestamp();
        let issued = issue(&credentials(), "user@example.com", 120).expect("issue");
        let after = Utc::now().timestamp();

        let claims = decode_claims(&issued.token);
        assert!(claims.exp >= before + 120);
        assert!(claims.exp <= after + 121);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn successive_tokens_are_distinct() {
        let first = issue(&credentials(), "user@example.com", DEFAULT_TTL_SECONDS).expect("issue");
        let second = issue(&credentials(), "user@example.com", DEFAULT_TTL_SECONDS).expect("issue");

        assert_ne!(first.token, second.token);
        assert_ne!(
            decode_claims(&first.token).jti,
            decode_claims(&second.token).jti
        );
    }

    #[test]
    fn claims_carry_audience_scope_and_nested_site() {
        let issued = issue(&credentials(), "viewer@example.com", 300).expect("issue");

        // Inspect the payload without signature verification, the way the
        // embedding widget's diagnostics do.
        let payload = issued.token.split('.').nth(1).expect("payload segment");
        let bytes = URL_SAFE_NO_PAD.decode(payload).expect("base64 payload");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("claims json");

        assert_eq!(value["aud"], "tableau");
        assert_eq!(value["scp"], serde_json::json!(["tableau:views:embed"]));
        assert_eq!(value["site"]["id"], credentials().site_id);
        assert_eq!(value["sub"], "viewer@example.com");
        assert_eq!(value["iss"], "client-abc");
    }

    #[test]
    fn header_carries_kid_only_when_configured() {
        let with_kid = issue(&credentials(), "user@example.com", 300).expect("issue");
        assert_eq!(
            decode_header(&with_kid.token).expect("header").kid,
            Some("secret-kid".to_string())
        );

        let mut anonymous = credentials();
        anonymous.secret_id = None;
        let without_kid = issue(&anonymous, "user@example.com", 300).expect("issue");
        assert_eq!(decode_header(&without_kid.token).expect("header").kid, None);
    }

    #[test]
    fn rejects_missing_credentials_before_signing() {
        for (field, mutate) in [
            (
                "client_id",
                Box::new(|c: &mut SigningCredentials| c.client_id.clear())
                    as Box<dyn Fn(&mut SigningCredentials)>,
            ),
            (
                "secret_value",
                Box::new(|c: &mut SigningCredentials| c.secret_value.clear()),
            ),
            (
                "site_id",
                Box::new(|c: &mut SigningCredentials| c.site_id.clear()),
            ),
        ] {
            let mut broken = credentials();
            mutate(&mut broken);
            match issue(&broken, "user@example.com", 300) {
                Err(TokenError::MissingCredential(missing)) => assert_eq!(missing, field),
                other => panic!("expected missing '{field}', got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_positive_ttl() {
        assert!(matches!(
            issue(&credentials(), "user@example.com", 0),
            Err(TokenError::InvalidTtl(0))
        ));
        assert!(matches!(
            issue(&credentials(), "user@example.com", -5),
            Err(TokenError::InvalidTtl(-5))
        ));
    }

    #[test]
    fn trims_padded_secret_before_signing() {
        let mut padded = credentials();
        padded.secret_value = format!("  {SECRET}\n");
        let issued = issue(&padded, "user@example.com", 300).expect("issue");
        // Verifies against the unpadded secret.
        decode_claims(&issued.token);
    }
}
