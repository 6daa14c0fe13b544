/// Authentication Routes
///
/// Login, token refresh, and the identity of the current bearer.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{Claims, CredentialCheck, Origin, SessionAuthenticator};
use crate::error::{AppError, ErrorContext};
use crate::validators::is_valid_username;

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Token pair returned by login
#[derive(Serialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Access token returned by refresh
#[derive(Serialize)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub token_type: &'static str,
}

/// Identity context of an authenticated request
#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub machine_ip: Option<String>,
    pub port: Option<String>,
}

/// POST /login
///
/// Issues an access/refresh pair for a principal the credential service
/// recognises. The peer address is embedded in both tokens.
///
/// # Errors
/// - 400: Username empty, too long or containing control characters
/// - 401: Unknown principal or credential service unavailable
pub async fn login<C: CredentialCheck>(
    req: HttpRequest,
    form: web::Json<LoginRequest>,
    authenticator: web::Data<SessionAuthenticator<C>>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");

    let username = is_valid_username(&form.username)?;
    let context = context.with_subject(username.as_str());
    let origin = req.peer_addr().map(Origin::from_socket).unwrap_or_default();

    let login = authenticator
        .login(&username, origin)
        .await
        .map_err(AppError::from)
        .inspect_err(|e| context.log_error(e))?;

    tracing::info!(
        request_id = %context.request_id,
        subject = %username,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: login.tokens.access_token,
        refresh_token: login.tokens.refresh_token,
        token_type: login.token_type,
    }))
}

/// POST /refresh
///
/// Issues a new access token from a previously issued token, even an
/// expired one. The refresh token is returned to the client unchanged.
///
/// # Errors
/// - 403: Token is malformed, signed with another key, or of the wrong kind
pub async fn refresh<C: CredentialCheck>(
    form: web::Json<RefreshRequest>,
    authenticator: web::Data<SessionAuthenticator<C>>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let access_token = authenticator
        .refresh(&form.refresh_token)
        .map_err(AppError::from)
        .inspect_err(|e| context.log_error(e))?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse {
        access_token,
        token_type: crate::auth::TOKEN_TYPE,
    }))
}

/// GET /api/me
///
/// **Requires a valid access token**; claims are injected by `BearerAuth`.
pub async fn current_user(claims: web::ReqData<Claims>) -> HttpResponse {
    let claims = claims.into_inner();
    let origin = claims.origin();

    HttpResponse::Ok().json(CurrentUserResponse {
        username: claims.sub,
        machine_ip: origin.address,
        port: origin.port,
    })
}
