/// Token verification
///
/// Decodes a token through the codec and, unless told otherwise,
/// rejects it once its expiry has been reached.

use std::sync::Arc;

use crate::auth::claims::Claims;
use crate::auth::clock::Clock;
use crate::auth::codec::TokenCodec;
use crate::error::TokenError;

/// Whether verification checks the `exp` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Enforce,
    /// Only for the refresh flow. Guards must never use this.
    Ignore,
}

pub struct TokenVerifier {
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, clock }
    }

    /// Verify a token and return its claims
    ///
    /// Does not look at the token kind; callers restrict it when needed.
    ///
    /// # Errors
    /// - `SignatureInvalid` / `Malformed` from the codec
    /// - `Expired` if `expiry` is `Enforce` and `exp <= now`
    pub fn verify(&self, token: &str, expiry: Expiry) -> Result<Claims, TokenError> {
        let claims = self.codec.decode(token)?;

        if expiry == Expiry::Enforce && claims.is_expired_at(self.clock.now()) {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, "Token expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{Origin, TokenKind};
    use crate::auth::clock::ManualClock;
    use crate::auth::issuer::TokenIssuer;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    struct Fixture {
        clock: Arc<ManualClock>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
    }

    fn fixture(now: i64) -> Fixture {
        let codec = Arc::new(TokenCodec::new(SECRET, "HS256").unwrap());
        let clock = Arc::new(ManualClock::new(now));
        Fixture {
            issuer: TokenIssuer::new(codec.clone(), clock.clone()),
            verifier: TokenVerifier::new(codec, clock.clone()),
            clock,
        }
    }

    fn issue_alice(f: &Fixture) -> String {
        f.issuer
            .issue("alice", TokenKind::Access, Duration::minutes(30), &Origin::default())
            .unwrap()
    }

    #[test]
    fn test_verify_before_expiry() {
        let f = fixture(1000);
        let token = issue_alice(&f);

        f.clock.set(2700);
        let claims = f.verifier.verify(&token, Expiry::Enforce).expect("Failed to verify");

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp, 2800);
    }

    #[test]
    fn test_verify_after_expiry() {
        let f = fixture(1000);
        let token = issue_alice(&f);

        f.clock.set(2900);
        assert_eq!(f.verifier.verify(&token, Expiry::Enforce), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary() {
        let f = fixture(1000);
        let token = issue_alice(&f);

        f.clock.set(2799);
        assert!(f.verifier.verify(&token, Expiry::Enforce).is_ok());

        f.clock.set(2800);
        assert_eq!(f.verifier.verify(&token, Expiry::Enforce), Err(TokenError::Expired));

        f.clock.set(2801);
        assert_eq!(f.verifier.verify(&token, Expiry::Enforce), Err(TokenError::Expired));
    }

    #[test]
    fn test_ignore_expiry_accepts_lapsed_token() {
        let f = fixture(1000);
        let token = issue_alice(&f);

        f.clock.set(1_000_000);
        let claims = f.verifier.verify(&token, Expiry::Ignore).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_ignore_expiry_still_checks_signature() {
        let f = fixture(1000);
        let token = issue_alice(&f);
        let other = TokenVerifier::new(
            Arc::new(TokenCodec::new("some-other-secret-value-here", "HS256").unwrap()),
            f.clock.clone(),
        );

        assert_eq!(other.verify(&token, Expiry::Ignore), Err(TokenError::SignatureInvalid));
        assert!(matches!(
            f.verifier.verify("garbage", Expiry::Ignore),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_kind_is_not_checked() {
        let f = fixture(1000);
        let refresh = f
            .issuer
            .issue("alice", TokenKind::Refresh, Duration::days(7), &Origin::default())
            .unwrap();

        let claims = f.verifier.verify(&refresh, Expiry::Enforce).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
    }
}
