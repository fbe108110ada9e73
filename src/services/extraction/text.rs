//! PDF 文本提取与整理

use crate::errors::{PaperHubError, Result};

/// 去掉每行首尾空白并丢弃空行
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 按字符数截断，返回是否发生截断
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// 提取 PDF 文本（阻塞，调用方放到 spawn_blocking）
pub fn extract_pdf_text(data: &[u8]) -> Result<String> {
    let raw = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| PaperHubError::extraction(format!("Failed to read PDF: {e}")))?;
    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(PaperHubError::extraction(
            "No text could be extracted from this PDF. It may be scanned or encrypted.",
        ));
    }
    Ok(text)
}

/// 在阻塞线程池中提取并截断
pub async fn extract_pdf_text_async(data: Vec<u8>, max_chars: usize) -> Result<(String, bool)> {
    run_blocking(move || {
        let text = extract_pdf_text(&data)?;
        let (kept, truncated) = truncate_chars(&text, max_chars);
        Ok((kept.to_string(), truncated))
    })
    .await
}

/// pdf-extract 遇到损坏的文件可能 panic，panic 转为提取错误
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(PaperHubError::extraction(format!("Failed to read PDF: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_blank_lines() {
        let raw = "  RONGO UNIVERSITY  \n\n\t\nQUESTION ONE (30 MARKS)\r\n   a) Define  \n";
        assert_eq!(
            normalize_text(raw),
            "RONGO UNIVERSITY\nQUESTION ONE (30 MARKS)\na) Define"
        );
        assert_eq!(normalize_text(" \n \n"), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 2), ("hé", true));
        assert_eq!(truncate_chars(text, 7), ("héllo w", true));
        assert_eq!(truncate_chars(text, 11), (text, false));
        assert_eq!(truncate_chars(text, 50), (text, false));
        assert_eq!(truncate_chars("", 0), ("", false));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = extract_pdf_text(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, PaperHubError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_panicking_extraction_becomes_error() {
        let err = run_blocking::<String, _>(|| panic!("unexpected token in content stream"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaperHubError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_async_extraction_rejects_garbage() {
        let err = extract_pdf_text_async(b"%PDF-1.4 truncated".to_vec(), 1000)
            .await
            .unwrap_err();
        assert!(matches!(err, PaperHubError::Extraction(_)));
    }
}
