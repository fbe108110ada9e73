use serde::Serialize;
use ts_rs::TS;

/// 上传结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    /// 提交试卷时引用的令牌
    pub download_token: String,
    pub file_name: String,
    /// 字节数
    pub size: i64,
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
