//! OpenAI 兼容的 SSE 流解析

/// 从单行 `data:` 报文中取出 `choices[0].delta.content`
///
/// `[DONE]`、空内容以及无法解析的行都返回 None。
pub fn parse_delta_line(line: &str) -> Option<String> {
    let data = line.trim().strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(data).ok()?;
    let content = value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;

    (!content.is_empty()).then(|| content.to_string())
}

/// 按行切分字节流；跨块的半行（包括被截断的 UTF-8 字符）留到下一块
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一块数据，返回其中完整行解析出的增量文本
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut deltas = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Ok(line) = std::str::from_utf8(&line)
                && let Some(delta) = parse_delta_line(line)
            {
                deltas.push(delta);
            }
        }
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delta_line() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_delta_line(line).as_deref(), Some("Hello"));

        assert_eq!(parse_delta_line("data: [DONE]"), None);
        assert_eq!(parse_delta_line(": keep-alive"), None);
        assert_eq!(parse_delta_line("data: {not json"), None);
        assert_eq!(parse_delta_line(""), None);
        // 角色块没有 content
        assert_eq!(
            parse_delta_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
    }

    #[test]
    fn test_decoder_handles_split_chunks() {
        let mut decoder = SseDecoder::new();
        let full = "data: {\"choices\":[{\"delta\":{\"content\":\"Jambo \"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"dünia\"}}]}\n\n\
                    data: [DONE]\n\n";
        let bytes = full.as_bytes();

        // 在多字节字符中间切开
        let split = full.find('ü').unwrap() + 1;
        let mut out = decoder.push(&bytes[..split]);
        assert_eq!(out, vec!["Jambo ".to_string()]);
        out = decoder.push(&bytes[split..]);
        assert_eq!(out, vec!["dünia".to_string()]);
    }

    #[test]
    fn test_decoder_skips_garbage() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b"event: ping\ngarbage\r\ndata: {\"choices\":[]}\n");
        assert!(out.is_empty());
    }
}
