use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Decodes and validates a bearer token. Only access tokens are accepted here.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Refresh tokens cannot be used for API access".to_string());
    }

    Ok(claims)
}

#[cfg(test)]
pub(crate) fn issue_token(
    user_id: u64,
    username: &str,
    role: u8,
    token_type: TokenType,
    secret: &str,
    ttl: usize,
) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        user_id,
        sub: username.to_string(),
        role,
        exp: now + ttl,
        jti: uuid::Uuid::new_v4().to_string(),
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn accepts_access_token() {
        let token = issue_token(5, "jdoe", 3, TokenType::Access, SECRET, 900);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 5);
        assert_eq!(claims.sub, "jdoe");
        assert_eq!(claims.role, 3);
    }

    #[test]
    fn rejects_refresh_token() {
        let token = issue_token(5, "jdoe", 3, TokenType::Refresh, SECRET, 900);
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue_token(5, "jdoe", 3, TokenType::Access, SECRET, 900);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
