use axum::extract::FromRef;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::claims::{Claims, Session};
use crate::{config::JwtConfig, state::AppState};

/// Session tokens stay valid for a day unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::hours(24);

/// Upper bound on a configured token lifetime (one year).
pub const MAX_TTL_HOURS: i64 = 24 * 365;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    InvalidSecret,

    #[error("token lifetime must be between 1 and {} hours", MAX_TTL_HOURS)]
    InvalidTtl,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature or algorithm does not match")]
    SignatureMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureMismatch,
            _ => TokenError::Malformed,
        }
    }
}

/// HMAC keys derived once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }
        if ttl <= Duration::ZERO || ttl > Duration::hours(MAX_TTL_HOURS) {
            return Err(TokenError::InvalidTtl);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    /// Rejects an empty secret and a lifetime outside `1..=MAX_TTL_HOURS`.
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, TokenError> {
        if !(1..=MAX_TTL_HOURS).contains(&cfg.ttl_hours) {
            return Err(TokenError::InvalidTtl);
        }
        Self::new(cfg.secret.as_bytes(), Duration::hours(cfg.ttl_hours))
    }

    pub fn sign(&self, account_id: i64) -> Result<String, TokenError> {
        self.sign_at(account_id, OffsetDateTime::now_utc())
    }

    pub fn sign_at(&self, account_id: i64, issued_at: OffsetDateTime) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".into()))?;
        let claims = Claims {
            user_id: account_id.to_string(),
            exp: expires_at.unix_timestamp(),
            iat: issued_at.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(account_id, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Session, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Validity depends only on the token, the key and `now`.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<Session, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            warn!(alg = ?header.alg, "jwt with non-hmac algorithm rejected");
            return Err(TokenError::SignatureMismatch);
        }

        let mut validation = Validation::new(header.alg);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = false; // checked below against `now`
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;

        if claims.exp < now.unix_timestamp() {
            return Err(TokenError::Expired);
        }
        let account_id = claims
            .user_id
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(TokenError::Malformed)?;

        debug!(account_id, "jwt verified");
        Ok(Session {
            account_id,
            expires_at: claims.exp,
        })
    }
}

/// Issue a 24h session token for `account_id`.
pub fn create_token(account_id: i64, secret: &[u8]) -> Result<String, TokenError> {
    JwtKeys::new(secret, DEFAULT_TTL)?.sign(account_id)
}

pub fn validate_token(token: &str, secret: &[u8]) -> Result<Session, TokenError> {
    JwtKeys::new(secret, DEFAULT_TTL)?.verify(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"dev-secret";

    // {"alg":"RS256","typ":"JWT"} . {"userID":"1","exp":4102444800} . junk
    const RS256_TOKEN: &str =
        "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJ1c2VySUQiOiIxIiwiZXhwIjo0MTAyNDQ0ODAwfQ.c2ln";
    // {"alg":"none","typ":"JWT"} . same payload . empty signature
    const NONE_TOKEN: &str =
        "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJ1c2VySUQiOiIxIiwiZXhwIjo0MTAyNDQ0ODAwfQ.";

    #[test]
    fn create_and_validate_roundtrip() {
        let token = create_token(42, SECRET).expect("sign");
        assert!(!token.is_empty());
        let session = validate_token(&token, SECRET).expect("verify");
        assert_eq!(session.account_id, 42);
    }

    #[test]
    fn expiry_is_a_day_after_issue() {
        let keys = JwtKeys::new(SECRET, DEFAULT_TTL).unwrap();
        let issued = OffsetDateTime::now_utc();
        let token = keys.sign_at(1, issued).unwrap();
        let session = keys.verify_at(&token, issued).unwrap();
        assert_eq!(session.expires_at, issued.unix_timestamp() + 24 * 60 * 60);
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(create_token(1, b"").unwrap_err(), TokenError::InvalidSecret);
        assert_eq!(validate_token("a.b.c", b"").unwrap_err(), TokenError::InvalidSecret);
        assert!(JwtKeys::new(b"", DEFAULT_TTL).is_err());
    }

    fn config(ttl_hours: i64) -> JwtConfig {
        JwtConfig {
            secret: "s".into(),
            ttl_hours,
        }
    }

    #[test]
    fn configured_ttl_must_be_in_range() {
        for ttl_hours in [i64::MIN, -1, 0, MAX_TTL_HOURS + 1, 100_000_000, i64::MAX] {
            assert_eq!(
                JwtKeys::from_config(&config(ttl_hours)).err(),
                Some(TokenError::InvalidTtl),
                "ttl_hours = {}",
                ttl_hours
            );
        }
        assert!(JwtKeys::new(SECRET, Duration::ZERO).is_err());
        assert!(JwtKeys::new(SECRET, -DEFAULT_TTL).is_err());

        let keys = JwtKeys::from_config(&config(MAX_TTL_HOURS)).unwrap();
        let session = keys.verify(&keys.sign(1).unwrap()).unwrap();
        assert_eq!(session.account_id, 1);

        let keys = JwtKeys::from_config(&config(1)).unwrap();
        assert!(keys.verify(&keys.sign(1).unwrap()).is_ok());
    }

    #[test]
    fn expiry_past_the_calendar_is_a_signing_error() {
        let keys = JwtKeys::new(SECRET, DEFAULT_TTL).unwrap();
        let issued = time::macros::datetime!(9999-12-31 12:00 UTC);
        assert!(matches!(keys.sign_at(1, issued), Err(TokenError::Signing(_))));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(validate_token("", SECRET).unwrap_err(), TokenError::Malformed);
        assert_eq!(
            validate_token("Invalid token string", SECRET).unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(validate_token(NONE_TOKEN, SECRET).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        assert_eq!(
            validate_token(RS256_TOKEN, SECRET).unwrap_err(),
            TokenError::SignatureMismatch
        );
    }

    #[test]
    fn other_hmac_variants_verify() {
        let claims = Claims {
            user_id: "9".into(),
            exp: OffsetDateTime::now_utc().unix_timestamp() + 60,
            iat: 0,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap().account_id, 9);
    }

    #[test]
    fn wrong_secret_is_signature_mismatch() {
        let token = create_token(5, b"secret-a").unwrap();
        assert_eq!(
            validate_token(&token, b"secret-b").unwrap_err(),
            TokenError::SignatureMismatch
        );
    }

    #[test]
    fn token_issued_in_the_past_is_expired() {
        let keys = JwtKeys::new(SECRET, DEFAULT_TTL).unwrap();
        let token = keys
            .sign_at(3, OffsetDateTime::now_utc() - Duration::hours(48))
            .unwrap();
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn expiry_is_strict() {
        let keys = JwtKeys::new(SECRET, DEFAULT_TTL).unwrap();
        let issued = OffsetDateTime::now_utc();
        let token = keys.sign_at(3, issued).unwrap();
        let exp = issued + DEFAULT_TTL;
        assert!(keys.verify_at(&token, exp).is_ok());
        assert_eq!(
            keys.verify_at(&token, exp + Duration::seconds(1)).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn non_numeric_account_claim_is_malformed() {
        let claims = Claims {
            user_id: "abc".into(),
            exp: OffsetDateTime::now_utc().unix_timestamp() + 60,
            iat: 0,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), TokenError::Malformed);
    }
}
