/// Error Handling Module
///
/// Unified error handling for the gateway:
/// 1. Token-level errors raised by the codec, issuer and verifier
/// 2. Flow-level authentication outcomes raised by the session authenticator
/// 3. Validation and configuration errors
/// 4. HTTP response mapping with structured logging

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Failures while encoding, decoding or verifying a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not parseable as a signed token
    Malformed(String),
    /// Signature does not match (tampering, wrong secret or wrong algorithm)
    SignatureInvalid,
    /// Valid signature but the expiry has passed
    Expired,
    /// Claims rejected before signing
    InvalidClaims(String),
    UnsupportedAlgorithm(String),
    Encoding(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(msg) => write!(f, "Malformed token: {}", msg),
            TokenError::SignatureInvalid => write!(f, "Token signature is invalid"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::InvalidClaims(msg) => write!(f, "Invalid claims: {}", msg),
            TokenError::UnsupportedAlgorithm(alg) => {
                write!(f, "Unsupported signing algorithm: {}", alg)
            }
            TokenError::Encoding(msg) => write!(f, "Token encoding failed: {}", msg),
        }
    }
}

impl StdError for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::SignatureInvalid
            }
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Authentication flow outcomes surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login rejected or guard check failed
    Unauthenticated,
    /// Refresh presented a token that could not be verified
    InvalidToken,
    MissingToken,
    /// Token could not be produced for an accepted principal
    Issuance(TokenError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Could not validate credentials"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::Issuance(e) => write!(f, "Token issuance failed: {}", e),
        }
    }
}

impl StdError for AuthError {}

/// Validation errors for input data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooLong(&'static str, usize),
    SuspiciousContent(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
        }
    }
}

impl StdError for ValidationError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    Load(config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::Load(e) => write!(f, "Config load error: {}", e),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type returned by HTTP handlers
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (code, message) = match self {
            AppError::Validation(e) => ("VALIDATION_ERROR", e.to_string()),
            AppError::Auth(e) => match e {
                AuthError::Unauthenticated => {
                    ("UNAUTHENTICATED", "Could not validate credentials".to_string())
                }
                AuthError::InvalidToken => ("TOKEN_INVALID", "Invalid token".to_string()),
                AuthError::MissingToken => {
                    ("MISSING_TOKEN", "Missing authentication token".to_string())
                }
                // Never leak codec details to the client
                AuthError::Issuance(_) => ("INTERNAL_ERROR", "Internal server error".to_string()),
            },
        };

        let status = self.status_code();
        let error_response =
            ErrorResponse::new(request_id.to_string(), message, code.to_string(), status.as_u16());

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Auth(AuthError::Issuance(e)) => {
                tracing::error!(request_id = request_id, error = %e, "Token issuance error");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::Unauthenticated | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken => StatusCode::FORBIDDEN,
                AuthError::Issuance(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Request-scoped context attached to flow logs
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub subject: Option<String>,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            subject: None,
            operation: operation.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn log_error(&self, error: &AppError) {
        tracing::warn!(
            request_id = %self.request_id,
            operation = %self.operation,
            subject = ?self.subject,
            error = %error,
            "Request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::EmptyField("username");
        assert_eq!(err.to_string(), "username is empty");
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AppError::from(AuthError::Unauthenticated).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::InvalidToken).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Issuance(TokenError::Encoding("x".into()))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_response_carries_bearer_challenge() {
        let response = ResponseError::error_response(&AppError::from(AuthError::Unauthenticated));

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_issuance_error_hides_details() {
        let err = AppError::from(AuthError::Issuance(TokenError::Encoding("secret detail".into())));
        let (_, body) = ErrorHandler::error_response(&err, "req-1");

        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("secret detail"));
    }

    #[test]
    fn test_error_response_creation() {
        let response = ErrorResponse::new(
            "test-123".to_string(),
            "Test error".to_string(),
            "TEST_ERROR".to_string(),
            400,
        );

        assert_eq!(response.error_id, "test-123");
        assert_eq!(response.code, "TEST_ERROR");
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_error_context_creation() {
        let ctx = ErrorContext::new("login");
        assert_eq!(ctx.operation, "login");
        assert!(ctx.subject.is_none());

        let ctx = ctx.with_subject("alice");
        assert_eq!(ctx.subject.as_deref(), Some("alice"));
    }
}
