/// Session Authenticator
///
/// Orchestrates the login and refresh flows and the protected-resource
/// guard. Holds no per-session state: everything a session needs lives in
/// the signed tokens, so there is no server-side revocation.

use std::sync::Arc;

use chrono::Duration;

use crate::auth::claims::{Claims, Origin, TokenKind, TokenPair};
use crate::auth::clock::Clock;
use crate::auth::codec::TokenCodec;
use crate::auth::credentials::CredentialCheck;
use crate::auth::issuer::TokenIssuer;
use crate::auth::verifier::{Expiry, TokenVerifier};
use crate::configuration::AuthSettings;
use crate::error::{AuthError, ConfigError};

pub const TOKEN_TYPE: &str = "bearer";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub tokens: TokenPair,
    pub token_type: &'static str,
}

pub struct SessionAuthenticator<C> {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    credentials: C,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    require_refresh_kind: bool,
}

impl<C: CredentialCheck> SessionAuthenticator<C> {
    /// Build an authenticator from validated settings
    ///
    /// # Errors
    /// Returns error if the secret, algorithm or lifetimes are unusable
    pub fn new(
        settings: &AuthSettings,
        clock: Arc<dyn Clock>,
        credentials: C,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;

        let codec = Arc::new(
            TokenCodec::new(&settings.secret_key, &settings.algorithm)
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?,
        );

        Ok(Self {
            issuer: TokenIssuer::new(codec.clone(), clock.clone()),
            verifier: TokenVerifier::new(codec, clock),
            credentials,
            access_lifetime: settings.access_lifetime()?,
            refresh_lifetime: settings.refresh_lifetime()?,
            require_refresh_kind: settings.require_refresh_kind,
        })
    }

    /// Login flow: external existence check, then an access/refresh pair
    ///
    /// # Errors
    /// - `Unauthenticated` if the credential service does not vouch for `username`
    /// - `Issuance` if signing fails
    pub async fn login(&self, username: &str, origin: Origin) -> Result<LoginTokens, AuthError> {
        if !self.credentials.username_exists(username).await {
            tracing::warn!(subject = %username, "Login rejected by credential service");
            return Err(AuthError::Unauthenticated);
        }

        let tokens = self
            .issuer
            .issue_pair(username, &origin, self.access_lifetime, self.refresh_lifetime)
            .map_err(AuthError::Issuance)?;

        tracing::info!(
            subject = %username,
            machine_ip = origin.address.as_deref().unwrap_or(""),
            "Issued token pair"
        );

        Ok(LoginTokens {
            tokens,
            token_type: TOKEN_TYPE,
        })
    }

    /// Refresh flow: reissue an access token from a possibly expired token
    ///
    /// The presented token is verified with expiry ignored. The refresh
    /// token itself is never rotated.
    ///
    /// # Errors
    /// - `InvalidToken` if the token fails verification, or is an access
    ///   token while `require_refresh_kind` is set
    /// - `Issuance` if signing fails
    pub fn refresh(&self, presented: &str) -> Result<String, AuthError> {
        let claims = self.verifier.verify(presented, Expiry::Ignore).map_err(|e| {
            tracing::warn!(error = %e, "Refresh token rejected");
            AuthError::InvalidToken
        })?;

        if self.require_refresh_kind && claims.kind != TokenKind::Refresh {
            tracing::warn!(subject = %claims.sub, kind = %claims.kind, "Refresh requires a refresh token");
            return Err(AuthError::InvalidToken);
        }

        let access_token = self
            .issuer
            .issue(&claims.sub, TokenKind::Access, self.access_lifetime, &claims.origin())
            .map_err(AuthError::Issuance)?;

        tracing::info!(subject = %claims.sub, "Access token refreshed");
        Ok(access_token)
    }

    /// Protected-resource guard
    ///
    /// Kind is not checked: a refresh token is a valid bearer until it
    /// expires, as is an access token.
    ///
    /// # Errors
    /// Returns `Unauthenticated` for expired, tampered or malformed tokens
    pub fn authenticate(&self, presented: &str) -> Result<Claims, AuthError> {
        self.verifier.verify(presented, Expiry::Enforce).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::Unauthenticated
        })
    }
}
