pub mod claims;
pub mod credentials;
pub mod embed;
pub mod error;
pub mod signer;

pub use claims::{EmbedClaims, SiteClaim, AUDIENCE, EMBED_SCOPE};
pub use credentials::SigningCredentials;
pub use embed::{build_view_url, embedding_module_url};
pub use error::{TokenError, TokenResult};
pub use signer::{issue, IssuedToken, DEFAULT_TTL_SECONDS};
