use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{AuthUser, JwtClaims, Role};

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<AuthUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Token validation failed: {}", e);
        "Invalid token".to_string()
    })?;

    let claims = data.claims;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid subject claim".to_string())?;
    let role = match claims.role.as_deref() {
        Some("patient") => Role::Patient,
        Some("doctor") => Role::Doctor,
        Some("clinic_owner") => Role::ClinicOwner,
        Some("admin") => Role::Admin,
        _ => return Err("Missing or unknown role claim".to_string()),
    };

    Ok(AuthUser {
        id,
        full_name: claims.name.unwrap_or_default(),
        role,
    })
}

/// Issues a token for the given principal; used by tooling and tests.
pub fn issue_token(user: &AuthUser, jwt_secret: &str, ttl_secs: u64) -> Result<String, String> {
    let now = Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: user.id.to_string(),
        name: Some(user.full_name.clone()),
        role: Some(user.role.to_string()),
        exp: now + ttl_secs,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to issue token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_valid_token() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            full_name: "Dr. Asha Rao".to_string(),
            role: Role::Doctor,
        };
        let token = issue_token(&user, "secret", 3600).unwrap();
        let decoded = validate_token(&token, "secret").unwrap();
        assert_eq!(decoded.id, user.id);
        assert_eq!(decoded.role, Role::Doctor);
    }

    #[test]
    fn rejects_a_tampered_secret() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            full_name: "Dr. Asha Rao".to_string(),
            role: Role::Doctor,
        };
        let token = issue_token(&user, "secret", 3600).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }
}
