/// Token Claims structure
///
/// The payload carried inside every signed token. The shape is fixed:
/// origin metadata is always present on the wire, as an empty string
/// when the transport did not supply it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distinguishes short-lived access tokens from long-lived refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Network origin of the client at issuance time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    pub address: Option<String>,
    pub port: Option<String>,
}

impl Origin {
    pub fn new(address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            port: Some(port.into()),
        }
    }

    /// Origin taken from a socket address
    pub fn from_socket(addr: std::net::SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port().to_string())
    }
}

/// Claims for access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (authenticated principal)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub machine_ip: String,
    #[serde(default)]
    pub port: String,
}

impl Claims {
    pub fn new(
        subject: &str,
        kind: TokenKind,
        issued_at: i64,
        expires_at: i64,
        origin: &Origin,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            exp: expires_at,
            iat: issued_at,
            kind,
            machine_ip: origin.address.clone().unwrap_or_default(),
            port: origin.port.clone().unwrap_or_default(),
        }
    }

    /// Origin metadata, with empty fields read back as absent
    pub fn origin(&self) -> Origin {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Origin {
            address: non_empty(&self.machine_ip),
            port: non_empty(&self.port),
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Access and refresh token issued together for one subject
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize_with_fixed_shape() {
        let claims = Claims::new("alice", TokenKind::Access, 1000, 2800, &Origin::default());
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "alice");
        assert_eq!(json["exp"], 2800);
        assert_eq!(json["type"], "access");
        assert_eq!(json["machine_ip"], "");
        assert_eq!(json["port"], "");
    }

    #[test]
    fn test_origin_round_trips_through_claims() {
        let origin = Origin::new("10.0.0.7", "51234");
        let claims = Claims::new("bob", TokenKind::Refresh, 0, 60, &origin);

        assert_eq!(claims.machine_ip, "10.0.0.7");
        assert_eq!(claims.origin(), origin);
    }

    #[test]
    fn test_empty_origin_reads_back_as_none() {
        let claims = Claims::new("bob", TokenKind::Access, 0, 60, &Origin::default());
        let origin = claims.origin();

        assert!(origin.address.is_none());
        assert!(origin.port.is_none());
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new("alice", TokenKind::Access, 1000, 2800, &Origin::default());

        assert!(!claims.is_expired_at(2799));
        assert!(claims.is_expired_at(2800));
    }

    #[test]
    fn test_kind_parses_lowercase() {
        let kind: TokenKind = serde_json::from_str("\"refresh\"").unwrap();
        assert_eq!(kind, TokenKind::Refresh);
        assert!(serde_json::from_str::<TokenKind>("\"Refresh\"").is_err());
    }
}
