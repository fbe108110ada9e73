use serde::Serialize;
use ts_rs::TS;

/// 非流式对话结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatReply {
    pub content: String,
    pub model: String,
}

/// 临时 PDF 提取结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ExtractTextResponse {
    pub paper_id: Option<i64>,
    pub file_name: String,
    pub text: String,
    pub char_count: i64,
    /// 是否因长度上限被截断
    pub truncated: bool,
}
