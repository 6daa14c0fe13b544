/// Authentication module
///
/// Stateless token-based sessions: signed access/refresh tokens, their
/// verification, and the login/refresh flows built on top of them.

mod claims;
mod clock;
mod codec;
mod credentials;
mod issuer;
mod session;
mod verifier;

pub use claims::{Claims, Origin, TokenKind, TokenPair};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::TokenCodec;
pub use credentials::{CredentialCheck, HttpCredentialCheck};
pub use issuer::TokenIssuer;
pub use session::{LoginTokens, SessionAuthenticator, TOKEN_TYPE};
pub use verifier::{Expiry, TokenVerifier};
