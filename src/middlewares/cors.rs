//! 按配置构造 CORS 中间件

use actix_cors::Cors;
use actix_web::http::{Method, Uri, header::HeaderName};
use tracing::warn;

use crate::config::CorsConfig;

/// 列表中出现 `*` 时放开对应维度；无法解析的条目记录警告后跳过
pub fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.max_age);

    if is_wildcard(&config.allowed_origins) {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            if origin.parse::<Uri>().is_ok() {
                cors = cors.allowed_origin(origin);
            } else {
                warn!("Ignoring invalid CORS origin: {}", origin);
            }
        }
    }

    if is_wildcard(&config.allowed_methods) {
        cors = cors.allow_any_method();
    } else {
        let methods: Vec<Method> = config
            .allowed_methods
            .iter()
            .filter_map(|m| match Method::from_bytes(m.to_ascii_uppercase().as_bytes()) {
                Ok(method) => Some(method),
                Err(_) => {
                    warn!("Ignoring invalid CORS method: {}", m);
                    None
                }
            })
            .collect();
        cors = cors.allowed_methods(methods);
    }

    if is_wildcard(&config.allowed_headers) {
        cors = cors.allow_any_header();
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| match HeaderName::try_from(h.as_str()) {
                Ok(header) => Some(header),
                Err(_) => {
                    warn!("Ignoring invalid CORS header: {}", h);
                    None
                }
            })
            .collect();
        cors = cors.allowed_headers(headers);
    }

    cors
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::header, test, web};

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            allowed_headers: vec!["Authorization".to_string(), "Content-Type".to_string()],
            max_age: 600,
        }
    }

    async fn allow_origin_for(cfg: &CorsConfig, origin: &str) -> Option<String> {
        let app = test::init_service(
            App::new()
                .wrap(build_cors(cfg))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_web::test]
    async fn test_only_configured_origins_are_allowed() {
        let cfg = config(&["http://localhost:5173"]);
        assert_eq!(
            allow_origin_for(&cfg, "http://localhost:5173").await.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(allow_origin_for(&cfg, "https://evil.example").await, None);
    }

    #[actix_web::test]
    async fn test_wildcard_allows_any_origin() {
        let cfg = config(&["*"]);
        assert!(allow_origin_for(&cfg, "https://anywhere.example").await.is_some());
    }
}
