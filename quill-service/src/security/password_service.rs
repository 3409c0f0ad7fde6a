use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{Result, ServiceError};

/// 密码服务trait
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// 加密密码
    async fn hash(&self, password: &str) -> Result<String>;

    /// 验证密码
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// 基于bcrypt的密码服务实现
pub struct BcryptPasswordService {
    cost: u32,
}

impl BcryptPasswordService {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordService for BcryptPasswordService {
    async fn hash(&self, password: &str) -> Result<String> {
        hash(password, self.cost)
            .map_err(|e| ServiceError::Internal(format!("Bcrypt hash error: {}", e)))
    }

    async fn verify(&self, password: &str, hashed: &str) -> Result<bool> {
        verify(password, hashed)
            .map_err(|e| ServiceError::Internal(format!("Bcrypt verify error: {}", e)))
    }
}
