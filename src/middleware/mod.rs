/// Middleware module
///
/// Bearer-token guard for protected scopes.

mod bearer_auth;

pub use bearer_auth::{bearer_token, BearerAuth};
