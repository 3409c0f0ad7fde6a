use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use quill_domain::AuthenticatedUser;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// JWT Claims结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub name: String, // display name
    pub roles: Vec<String>,
    pub exp: usize, // expiration time
    pub iat: usize, // issued at
    pub iss: String, // issuer
    pub jti: String, // JWT ID
}

impl Claims {
    pub fn new(
        sub: String,
        name: String,
        roles: Vec<String>,
        issuer: String,
        expiration_seconds: u64,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as usize;

        Self {
            sub,
            name,
            roles,
            exp: now + expiration_seconds as usize,
            iat: now,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 转为请求扩展中携带的认证用户信息
    pub fn to_authenticated_user(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            username: self.sub.clone(),
            display_name: self.name.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// JWT服务
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiration: u64,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String, expiration: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            issuer,
            expiration,
        }
    }

    /// 生成JWT令牌
    pub fn generate(&self, username: &str, display_name: &str, roles: &[String]) -> Result<String> {
        let claims = Claims::new(
            username.to_string(),
            display_name.to_string(),
            roles.to_vec(),
            self.issuer.clone(),
            self.expiration,
        );
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("JWT encode error: {}", e))
    }

    /// 验证JWT令牌
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow!("JWT decode error: {}", e))?;

        Ok(token_data.claims)
    }

    /// 获取过期时间（秒）
    pub fn expiration(&self) -> u64 {
        self.expiration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generate_and_verify() {
        let service = JwtService::new("test_secret", "quill".to_string(), 3600);

        let roles = vec!["Author".to_string()];
        let token = service.generate("jane", "Jane Doe", &roles).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "jane");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.iss, "quill");
    }

    #[test]
    fn test_jwt_rejects_wrong_issuer() {
        let service = JwtService::new("test_secret", "quill".to_string(), 3600);
        let other = JwtService::new("test_secret", "someone-else".to_string(), 3600);

        let token = other.generate("jane", "Jane", &[]).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_jwt_rejects_tampered_token() {
        let service = JwtService::new("test_secret", "quill".to_string(), 3600);
        let token = service.generate("jane", "Jane", &[]).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.verify(&tampered).is_err());
    }
}
