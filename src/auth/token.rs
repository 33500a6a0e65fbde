use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT signing secret is empty")]
    EmptySecret,

    #[error("JWT generation error: {0}")]
    Generation(String),
}

/// Reason a token was rejected. Callers treat every variant the same way;
/// the distinction only feeds diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidToken {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    BadSignature,

    #[error("malformed token")]
    Malformed,
}

impl InvalidToken {
    pub fn reason(&self) -> &'static str {
        match self {
            InvalidToken::Expired => "token_expired",
            InvalidToken::BadSignature => "invalid_signature",
            InvalidToken::Malformed => "invalid_token",
        }
    }
}

/// Signs and verifies HS256 tokens with a process-wide secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => InvalidToken::Expired,
                ErrorKind::InvalidSignature => InvalidToken::BadSignature,
                _ => InvalidToken::Malformed,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;
    use chrono::{Duration, Utc};

    const SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

    fn sample_claims(role: Role) -> Claims {
        Claims::new(42, "dana@timey.test", role, "Dana Scully", Utc::now())
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let codec = TokenCodec::new(SECRET).unwrap();
        for raw in ["admin", "ADMIN", "employee", "TeamLead", "contractor", "Guest"] {
            let claims = sample_claims(Role::parse(raw));
            let token = codec.issue(&claims).unwrap();
            assert_eq!(codec.verify(&token).unwrap(), claims);
        }
    }

    #[test]
    fn token_aged_past_ttl_is_expired() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let issued = Utc::now() - Duration::hours(24) - Duration::seconds(5);
        let claims = Claims::new(1, "old@timey.test", Role::Admin, "Old", issued);
        let token = codec.issue(&claims).unwrap();

        assert_eq!(codec.verify(&token), Err(InvalidToken::Expired));
    }

    #[test]
    fn flipped_signature_bit_is_rejected() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let token = codec.issue(&sample_claims(Role::Employee)).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;
        let bytes = token.as_bytes();

        // The final character also carries base64 padding bits, so it is left out
        for pos in sig_start..bytes.len() - 1 {
            for bit in 0..6 {
                let mut tampered = bytes.to_vec();
                tampered[pos] ^= 1 << bit;
                let Ok(tampered) = String::from_utf8(tampered) else {
                    continue;
                };
                assert!(
                    codec.verify(&tampered).is_err(),
                    "tampered token accepted (pos {}, bit {})",
                    pos,
                    bit
                );
            }
        }
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let token = TokenCodec::new(b"secret-A")
            .unwrap()
            .issue(&sample_claims(Role::Admin))
            .unwrap();
        let other = TokenCodec::new(b"secret-B").unwrap();

        assert_eq!(other.verify(&token), Err(InvalidToken::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = TokenCodec::new(SECRET).unwrap();
        assert_eq!(codec.verify("not-a-jwt"), Err(InvalidToken::Malformed));
        assert_eq!(codec.verify(""), Err(InvalidToken::Malformed));
        assert_eq!(codec.verify("a.b.c"), Err(InvalidToken::Malformed));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenCodec::new(b""), Err(TokenError::EmptySecret)));
    }

    #[test]
    fn role_comparison_is_case_insensitive_on_decode() {
        let codec = TokenCodec::new(SECRET).unwrap();
        let now = Utc::now().timestamp();
        let payload = serde_json::json!({
            "id": 3,
            "email": "fox@timey.test",
            "role": "ADMIN",
            "name": "Fox",
            "iat": now,
            "exp": now + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec.verify(&token).unwrap().role, Role::Admin);
    }
}
