use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::FileService;
use super::multipart::read_single_file;
use crate::config::AppConfig;
use crate::errors::PaperHubError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::system::DynamicConfig;

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(req) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        )));
    };

    // 静态配置给目录，动态配置给限制
    let upload_dir = &AppConfig::get().upload.dir;
    let max_size = DynamicConfig::upload_max_size().await;
    let allowed_types = DynamicConfig::upload_allowed_types().await;

    let received = match read_single_file(&mut payload, &allowed_types, max_size).await {
        Ok(file) => file,
        Err(rejection) => {
            tracing::info!("Upload from user {} rejected: {:?}", user_id, rejection);
            return Ok(rejection.into_response());
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(upload_dir).await {
        tracing::error!("{}", PaperHubError::file_operation(format!("创建上传目录失败: {e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "Failed to prepare upload directory",
            )),
        );
    }

    let download_token = Uuid::new_v4().to_string();
    let stored_name = format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        download_token,
        received.extension
    );
    let file_path = std::path::Path::new(upload_dir).join(&stored_name);

    if let Err(e) = tokio::fs::write(&file_path, &received.data).await {
        tracing::error!("{}", PaperHubError::file_operation(format!("写入文件失败: {e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "Failed to store file",
            )),
        );
    }

    let storage = service.get_storage(req)?;
    let file = match storage
        .upload_file(
            &download_token,
            &received.original_name,
            &stored_name,
            received.data.len() as i64,
            &received.content_type,
            user_id,
        )
        .await
    {
        Ok(file) => file,
        Err(e) => {
            let _ = tokio::fs::remove_file(&file_path).await;
            tracing::error!("保存文件记录失败: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("Failed to upload file: {e}"),
                )),
            );
        }
    };

    tracing::info!(
        "User {} uploaded {} ({} bytes)",
        user_id,
        file.original_name,
        file.file_size
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FileUploadResponse {
            download_token: file.download_token,
            file_name: file.original_name,
            size: file.file_size,
            content_type: file.file_type,
            uploaded_at: file.uploaded_at,
        },
        "File uploaded successfully",
    )))
}
