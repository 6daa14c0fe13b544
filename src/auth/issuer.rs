/// Token issuance
///
/// Builds access and refresh claim sets with kind-specific lifetimes and
/// signs them through the shared codec.

use std::sync::Arc;

use chrono::Duration;

use crate::auth::claims::{Claims, Origin, TokenKind, TokenPair};
use crate::auth::clock::Clock;
use crate::auth::codec::TokenCodec;
use crate::error::TokenError;

pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, clock }
    }

    /// Issue a single token expiring `lifetime` from now
    ///
    /// # Errors
    /// Returns error if the subject is blank, the lifetime is not positive,
    /// or signing fails
    pub fn issue(
        &self,
        subject: &str,
        kind: TokenKind,
        lifetime: Duration,
        origin: &Origin,
    ) -> Result<String, TokenError> {
        self.issue_at(self.clock.now(), subject, kind, lifetime, origin)
    }

    /// Issue an access/refresh pair from one clock reading
    ///
    /// # Errors
    /// Returns error if either token cannot be issued
    pub fn issue_pair(
        &self,
        subject: &str,
        origin: &Origin,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();

        Ok(TokenPair {
            access_token: self.issue_at(now, subject, TokenKind::Access, access_lifetime, origin)?,
            refresh_token: self.issue_at(
                now,
                subject,
                TokenKind::Refresh,
                refresh_lifetime,
                origin,
            )?,
        })
    }

    fn issue_at(
        &self,
        now: i64,
        subject: &str,
        kind: TokenKind,
        lifetime: Duration,
        origin: &Origin,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::InvalidClaims("subject must not be empty".to_string()));
        }
        if lifetime <= Duration::zero() {
            return Err(TokenError::InvalidClaims(format!(
                "{} token lifetime must be positive",
                kind
            )));
        }

        let claims = Claims::new(subject, kind, now, now + lifetime.num_seconds(), origin);
        self.codec.encode(&claims)
    }
}
