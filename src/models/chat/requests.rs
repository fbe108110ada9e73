use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// 已入库的试卷
    pub paper_id: Option<i64>,
    /// 临时上传 PDF 提取出的文本
    pub paper_text: Option<String>,
    /// 临时文本时的标题
    pub paper_title: Option<String>,
    /// 默认流式返回
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

/// 单次对话最多携带的历史消息数
pub const MAX_CHAT_MESSAGES: usize = 40;

impl ChatRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("At least one message is required".to_string());
        }
        if self.messages.len() > MAX_CHAT_MESSAGES {
            return Err(format!(
                "Too many messages, at most {MAX_CHAT_MESSAGES} are allowed"
            ));
        }
        if self.messages.iter().any(|m| m.content.trim().is_empty()) {
            return Err("Messages must not be empty".to_string());
        }
        if self.messages.last().map(|m| m.role) != Some(ChatRole::User) {
            return Err("The last message must come from the user".to_string());
        }
        match (&self.paper_id, &self.paper_text) {
            (None, None) => Err("Either paper_id or paper_text is required".to_string()),
            (None, Some(text)) if text.trim().is_empty() => {
                Err("paper_text must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    fn request(messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            messages,
            paper_id: Some(1),
            paper_text: None,
            paper_title: None,
            stream: true,
        }
    }

    #[test]
    fn test_valid_conversation() {
        let r = request(vec![
            msg(ChatRole::User, "Summarise question 1"),
            msg(ChatRole::Assistant, "Question 1 asks..."),
            msg(ChatRole::User, "And question 2?"),
        ]);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_last_message_must_be_user() {
        let r = request(vec![
            msg(ChatRole::User, "hi"),
            msg(ChatRole::Assistant, "hello"),
        ]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_requires_context() {
        let mut r = request(vec![msg(ChatRole::User, "hi")]);
        r.paper_id = None;
        assert!(r.validate().is_err());
        r.paper_text = Some("Question 1".to_string());
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let parsed: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role":"system","content":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_stream_defaults_to_true() {
        let r: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}],"paper_id":3}"#)
                .unwrap();
        assert!(r.stream);
    }
}
