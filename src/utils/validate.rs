use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 3 <= 长度 <= 32（学号也可作为用户名）
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略：至少 8 位，同时包含字母和数字，且不在常见弱口令列表中
pub fn validate_password(password: &str) -> Result<(), String> {
    const WEAK: [&str; 6] = [
        "password1",
        "12345678a",
        "qwerty123",
        "admin123",
        "letmein1",
        "abcd1234",
    ];

    let mut errors = Vec::new();
    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK.iter().any(|w| password.eq_ignore_ascii_case(w)) {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// 归一化肯尼亚手机号为 `2547XXXXXXXX` / `2541XXXXXXXX`
///
/// 接受 `07..`、`01..`、`+254..`、`254..` 以及去掉开头 0 的 9 位号码，
/// 空格、横线等非数字字符会被去掉。
pub fn normalize_phone_number(input: &str) -> Result<String, &'static str> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = if let Some(rest) = digits.strip_prefix('0') {
        format!("254{rest}")
    } else if digits.starts_with("254") {
        digits
    } else {
        format!("254{digits}")
    };

    if normalized.len() != 12 {
        return Err("Phone number must be a valid Safaricom number, e.g. 0712345678");
    }
    if !matches!(normalized.as_bytes()[3], b'7' | b'1') {
        return Err("Phone number must start with 07 or 01");
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("AG.2021.001").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@rongovarsity.ac.ke").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Exams2024").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("1234567890").is_err());
        let err = validate_password("Password1").unwrap_err();
        assert!(err.contains("too common"));
    }

    #[test]
    fn test_phone_normalisation() {
        let cases = [
            ("0712345678", "254712345678"),
            ("+254712345678", "254712345678"),
            ("254712345678", "254712345678"),
            ("712345678", "254712345678"),
            ("0112 345 678", "254112345678"),
            ("+254-712-345-678", "254712345678"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_phone_number(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_phone_rejections() {
        assert!(normalize_phone_number("").is_err());
        assert!(normalize_phone_number("07123").is_err());
        assert!(normalize_phone_number("25471234567890").is_err());
        assert!(normalize_phone_number("0212345678").is_err());
    }
}
