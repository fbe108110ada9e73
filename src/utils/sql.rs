//! SQL 辅助函数

use sea_orm::sea_query::LikeExpr;

/// 转义 LIKE 通配符（`\`、`%`、`_`），转义字符为 `\`
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 子串匹配表达式：`%term%`，带转义声明
pub fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(term))).escape('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("AGEC 101"), "AGEC 101");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b\\c"), "a\\_b\\\\c");
    }
}
