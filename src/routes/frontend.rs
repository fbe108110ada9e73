//! 前端静态资源路由
//!
//! 构建产物通过 rust-embed 嵌入二进制。未知路径回退到 index.html（SPA），
//! 但 `/api/` 下的未知路径返回 JSON 404。HTML 中的 `%SYSTEM_NAME%` 会被替换为
//! 当前的系统名称设置。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX_HTML: &str = "index.html";

fn mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" | "webmanifest" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

// 带 hash 的构建产物可以长期缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/") && !path.ends_with(".html")
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if path == "api" || path.starts_with("api/") {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "API endpoint not found",
        )));
    }

    let (file_path, asset) = match FrontendAssets::get(path).filter(|_| !path.is_empty()) {
        Some(asset) => (path, Some(asset)),
        None => (INDEX_HTML, FrontendAssets::get(INDEX_HTML)),
    };

    let Some(asset) = asset else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("Frontend assets are not embedded in this build"));
    };

    let mime = mime_type(file_path);
    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if is_immutable_asset(file_path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    }

    if mime.starts_with("text/html") {
        let html = String::from_utf8_lossy(&asset.data)
            .replace("%SYSTEM_NAME%", &DynamicConfig::system_name().await);
        return Ok(response.body(html));
    }

    Ok(response.body(asset.data.into_owned()))
}

/// 配置前端路由（放在最后作为 fallback）
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(mime_type("assets/app.mjs"), "application/javascript; charset=utf-8");
        assert_eq!(mime_type("papers/sample.pdf"), "application/pdf");
        assert_eq!(mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/index-3f2a.js"));
        assert!(!is_immutable_asset("index.html"));
        assert!(!is_immutable_asset("manifest.webmanifest"));
    }
}
