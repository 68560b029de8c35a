use serde::{Deserialize, Serialize};

/// JWT payload carried by every authenticated request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Expiry as a unix timestamp.
    pub exp: usize,
    pub admin: bool,
}

/// Extractor wrapper around validated claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
