use serde::{Deserialize, Serialize};

/// Fixed audience Tableau expects on connected-app tokens.
pub const AUDIENCE: &str = "tableau";

/// Capability asserted by the token: embedding a view, nothing more.
pub const EMBED_SCOPE: &str = "tableau:views:embed";

/// Claim set of a connected-app embed token.
///
/// Built fresh per issuance and discarded after signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub jti: String,
    pub exp: i64,
    pub site: SiteClaim,
    pub scp: Vec<String>,
}

/// Tableau's documented schema wraps the site GUID in an object; the raw
/// string form accepted by some older servers is not emitted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteClaim {
    pub id: String,
}
