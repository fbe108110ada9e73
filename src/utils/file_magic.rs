//! 上传文件类型检查

/// PDF 头允许出现的最大偏移（部分生成器会在前面写入垃圾字节）
const PDF_HEADER_SEARCH_WINDOW: usize = 1024;

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// `data` 为文件开头的若干字节，`extension` 含点号（如 ".pdf"）。
/// 未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => {
            let window = &data[..data.len().min(PDF_HEADER_SEARCH_WINDOW)];
            window.windows(5).any(|w| w == b"%PDF-")
        }
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        _ => false,
    }
}

/// 取小写扩展名（含点号）
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// 扩展名对应的 MIME 类型
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        ".pdf" => "application/pdf",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// 清理用户提供的文件名，只保留最后一段路径并去掉控制字符和引号
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    if cleaned.is_empty() {
        "paper.pdf".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n%", ".pdf"));
        assert!(validate_magic_bytes(b"%PDF-1.4", ".PDF"));
        assert!(!validate_magic_bytes(b"PK\x03\x04", ".pdf"));
    }

    #[test]
    fn test_pdf_header_after_leading_bytes() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(b"%PDF-1.5");
        assert!(validate_magic_bytes(&data, ".pdf"));

        let mut far = vec![b' '; 2048];
        far.extend_from_slice(b"%PDF-1.5");
        assert!(!validate_magic_bytes(&far, ".pdf"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("AGEC 101 2023.PDF").as_deref(), Some(".pdf"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some(".gz"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".pdf"), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("C:\\Users\\me\\exam.pdf"), "exam.pdf");
        assert_eq!(sanitize_file_name("../../etc/\"x\".pdf"), "x.pdf");
        assert_eq!(sanitize_file_name("   "), "paper.pdf");
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for(".pdf"), "application/pdf");
        assert_eq!(content_type_for(".bin"), "application/octet-stream");
    }
}
