use thiserror::Error;

pub type TokenResult<T> = Result<T, TokenError>;

/// Failures while building or signing an embed token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The configured credentials cannot sign anything. Surfaced to the
    /// caller immediately, never retried.
    #[error("missing required credential field '{0}'")]
    MissingCredential(&'static str),
    #[error("token lifetime must be positive, got {0} seconds")]
    InvalidTtl(i64),
    #[error("failed to sign embed token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
