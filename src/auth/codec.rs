/// Token encoding and decoding
///
/// Serializes claims into a signed JWS compact token (header, payload and
/// HMAC signature, base64url encoded and dot separated) and reverses it.
/// The header declares the algorithm so the token is self-describing.

use std::str::FromStr;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::error::TokenError;

/// Signs and verifies tokens with one shared secret and one algorithm
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec for `algorithm` (e.g. "HS256")
    ///
    /// # Errors
    /// Returns error if the secret is empty or the algorithm is not an
    /// HMAC algorithm
    pub fn new(secret: &str, algorithm: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidClaims("secret must not be empty".to_string()));
        }

        let algorithm = Algorithm::from_str(algorithm)
            .ok()
            .filter(|alg| matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .ok_or_else(|| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        let mut validation = Validation::new(algorithm);
        // Expiry is enforced by the verifier against its own clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Serialize and sign a claim set
    ///
    /// # Errors
    /// Returns error if serialization or signing fails
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify the signature and recover the claim set
    ///
    /// # Errors
    /// - `SignatureInvalid` if the signature or declared algorithm does not match
    /// - `Malformed` if the token cannot be parsed
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}
