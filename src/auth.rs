/// Request signing for Upbit's authenticated endpoints.
///
/// Implements:
/// - credential handling (secret key held in a [`SecretString`])
/// - claim construction with a fresh UUID v4 nonce per call
/// - query binding: SHA-512 over the encoded query string, hex encoded
/// - compact HS256 JWT serialization, prefixed with `Bearer `
///
/// Signing is a pure function of its inputs. Nothing here caches a token.
use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use uuid::Uuid;

use crate::endpoint::QueryParams;
use crate::errors::UpbitError;

type HmacSha256 = Hmac<Sha256>;

pub const BEARER_PREFIX: &str = "Bearer ";
pub const QUERY_HASH_ALG: &str = "SHA512";

pub const ACCESS_KEY_ENV: &str = "UPBIT_ACCESS_KEY";
pub const SECRET_KEY_ENV: &str = "UPBIT_SECRET_KEY";

/// Fixed JOSE header for HS256 tokens.
const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// API key pair issued by Upbit.
///
/// Neither key appears in `Debug` output.
pub struct Credentials {
    access_key: String,
    secret_key: SecretString,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Read `UPBIT_ACCESS_KEY` and `UPBIT_SECRET_KEY` from the environment.
    pub fn from_env() -> Result<Self, UpbitError> {
        let access_key = std::env::var(ACCESS_KEY_ENV)
            .map_err(|_| UpbitError::Config(format!("{ACCESS_KEY_ENV} is not set")))?;
        let secret_key = std::env::var(SECRET_KEY_ENV)
            .map_err(|_| UpbitError::Config(format!("{SECRET_KEY_ENV} is not set")))?;
        Ok(Self::new(access_key, secret_key))
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// The claim set signed into every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaim {
    pub access_key: String,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_hash_alg: Option<String>,
}

impl AuthClaim {
    /// Build a claim with a fresh nonce, bound to `query` when it is non-empty.
    pub fn new(access_key: &str, query: Option<&QueryParams>) -> Self {
        let query_hash = query
            .filter(|q| !q.is_empty())
            .map(|q| query_hash(&q.encode()));
        Self {
            access_key: access_key.to_string(),
            nonce: Uuid::new_v4().to_string(),
            query_hash_alg: query_hash.as_ref().map(|_| QUERY_HASH_ALG.to_string()),
            query_hash,
        }
    }

    /// Decode the claim set of a token without verifying its signature.
    pub fn from_token(token: &AuthToken) -> Result<Self, UpbitError> {
        Self::from_authorization(token.as_str())
    }

    /// Decode the claim set of an `Authorization` header value
    /// (`Bearer <jwt>` or a bare JWT) without verifying its signature.
    pub fn from_authorization(value: &str) -> Result<Self, UpbitError> {
        let compact = value.strip_prefix(BEARER_PREFIX).unwrap_or(value);
        let payload = compact
            .split('.')
            .nth(1)
            .ok_or_else(|| UpbitError::InvalidParameter("token is not a compact JWT".into()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| UpbitError::InvalidParameter(format!("token payload: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| UpbitError::InvalidParameter(format!("token claims: {e}")))
    }
}

/// A signed `Authorization` header value. Valid for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(Bearer <redacted>)")
    }
}

/// Hex-encoded SHA-512 of an encoded query string.
pub fn query_hash(encoded_query: &str) -> String {
    hex::encode(Sha512::digest(encoded_query.as_bytes()))
}

/// Sign a fresh claim for one request.
///
/// `query` must be the exact parameter set the request will carry; the token
/// is rejected server-side otherwise.
pub fn sign(credentials: &Credentials, query: Option<&QueryParams>) -> Result<AuthToken, UpbitError> {
    let secret = credentials.secret_key.expose_secret();
    if secret.is_empty() {
        return Err(UpbitError::Signing("secret key is empty".into()));
    }
    let claim = AuthClaim::new(credentials.access_key(), query);
    let compact = encode_hs256(&claim, secret.as_bytes())?;
    Ok(AuthToken(format!("{BEARER_PREFIX}{compact}")))
}

/// Serialize `claim` as a compact JWS using HMAC-SHA256.
fn encode_hs256(claim: &AuthClaim, key: &[u8]) -> Result<String, UpbitError> {
    let payload = serde_json::to_vec(claim)
        .map_err(|e| UpbitError::Signing(format!("claim serialization: {e}")))?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| UpbitError::Signing(format!("invalid secret key: {e}")))?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
}
