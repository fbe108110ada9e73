//! 单文件 multipart 读取
//!
//! 上传试卷与临时提取文本共用：只接受名为 `file` 的单个字段，
//! 按扩展名白名单、魔术字节和大小上限校验，内容读入内存。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::{StreamExt, TryStreamExt};

use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::{content_type_for, file_extension, sanitize_file_name};
use crate::utils::validate_magic_bytes;

const FILE_FIELD: &str = "file";

/// 通过校验的上传文件
#[derive(Debug)]
pub struct ReceivedFile {
    pub original_name: String,
    pub extension: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 拒绝原因
#[derive(Debug, PartialEq, Eq)]
pub enum UploadRejection {
    Missing,
    Multiple,
    TypeNotAllowed,
    ContentMismatch,
    TooLarge,
    Malformed(String),
}

impl UploadRejection {
    pub fn into_response(self) -> HttpResponse {
        let (code, message) = match self {
            UploadRejection::Missing => (
                ErrorCode::FileNotFound,
                "No file found in upload payload".to_string(),
            ),
            UploadRejection::Multiple => (
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time".to_string(),
            ),
            UploadRejection::TypeNotAllowed => (
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed".to_string(),
            ),
            UploadRejection::ContentMismatch => (
                ErrorCode::FileTypeNotAllowed,
                "File content does not match its extension".to_string(),
            ),
            UploadRejection::TooLarge => (
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit".to_string(),
            ),
            UploadRejection::Malformed(e) => (
                ErrorCode::FileUploadFailed,
                format!("Malformed upload: {e}"),
            ),
        };
        let mut builder = match code {
            ErrorCode::FileSizeExceeded => HttpResponse::PayloadTooLarge(),
            _ => HttpResponse::BadRequest(),
        };
        builder.json(ApiResponse::error_empty(code, message))
    }
}

/// 检查扩展名与文件头
pub fn check_file(
    file_name: &str,
    head: &[u8],
    allowed_types: &[String],
) -> Result<String, UploadRejection> {
    let extension = file_extension(file_name).ok_or(UploadRejection::TypeNotAllowed)?;
    if !allowed_types.iter().any(|t| t.eq_ignore_ascii_case(&extension)) {
        return Err(UploadRejection::TypeNotAllowed);
    }
    if !validate_magic_bytes(head, &extension) {
        return Err(UploadRejection::ContentMismatch);
    }
    Ok(extension)
}

/// 读取唯一的 `file` 字段，其余字段忽略
pub async fn read_single_file(
    payload: &mut Multipart,
    allowed_types: &[String],
    max_size: usize,
) -> Result<ReceivedFile, UploadRejection> {
    let mut received: Option<ReceivedFile> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadRejection::Malformed(e.to_string()))?
    {
        let content_disposition = field.content_disposition().cloned();
        let name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default();
        if name != FILE_FIELD {
            continue;
        }
        if received.is_some() {
            return Err(UploadRejection::Multiple);
        }

        let original_name = sanitize_file_name(
            content_disposition
                .as_ref()
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default(),
        );

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadRejection::Malformed(e.to_string()))?;
            if data.len() + chunk.len() > max_size {
                return Err(UploadRejection::TooLarge);
            }
            data.extend_from_slice(&chunk);
        }

        let extension = check_file(&original_name, &data, allowed_types)?;
        received = Some(ReceivedFile {
            content_type: content_type_for(&extension).to_string(),
            original_name,
            extension,
            data,
        });
    }

    received.ok_or(UploadRejection::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_only() -> Vec<String> {
        vec![".pdf".to_string()]
    }

    #[test]
    fn test_accepts_pdf() {
        assert_eq!(
            check_file("CAT 1.PDF", b"%PDF-1.5\n...", &pdf_only()),
            Ok(".pdf".to_string())
        );
    }

    #[test]
    fn test_rejects_wrong_extension() {
        assert_eq!(
            check_file("notes.docx", b"PK\x03\x04", &pdf_only()),
            Err(UploadRejection::TypeNotAllowed)
        );
        assert_eq!(
            check_file("no_extension", b"%PDF-1.5", &pdf_only()),
            Err(UploadRejection::TypeNotAllowed)
        );
    }

    #[test]
    fn test_rejects_renamed_file() {
        assert_eq!(
            check_file("paper.pdf", b"\x89PNG\r\n\x1a\n", &pdf_only()),
            Err(UploadRejection::ContentMismatch)
        );
    }

    #[test]
    fn test_rejection_status() {
        assert_eq!(
            UploadRejection::TooLarge.into_response().status(),
            actix_web::http::StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            UploadRejection::Missing.into_response().status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }
}
