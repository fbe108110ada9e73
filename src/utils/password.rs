use crate::config::AppConfig;
use crate::errors::PaperHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 使用配置中的 Argon2id 参数哈希密码
pub fn hash_password(password: &str) -> Result<String, PaperHubError> {
    let config = &AppConfig::get().argon2;
    hash_password_with(
        password,
        config.memory_cost,
        config.time_cost,
        config.parallelism,
    )
}

pub fn hash_password_with(
    password: &str,
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
) -> Result<String, PaperHubError> {
    let params = Params::new(memory_cost, time_cost, parallelism, None)
        .map_err(|e| PaperHubError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PaperHubError::validation(format!("密码哈希失败: {e}")))
}

/// 验证密码（参数从哈希串中读取）
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("Exams2024", 1024, 1, 1).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Exams2024", &hash));
        assert!(!verify_password("exams2024", &hash));
    }

    #[test]
    fn test_invalid_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
