/*!
 * 付费访问中间件
 *
 * 必须在 RequireJWT 之后使用。管理员直接放行；普通用户需要存在一笔
 * 已完成且未到期的支付，否则返回 402 与 `AccessRequired` 错误码。
 *
 * ```rust,ignore
 * web::resource("/{id}/download")
 *     .wrap(RequireAccess)
 *     .wrap(RequireJWT)
 *     .route(web::get().to(download_paper))
 * ```
 *
 * 放行时会把 [`AccessGrant`] 写入请求扩展。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use chrono::{DateTime, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;

#[derive(Clone)]
pub struct RequireAccess;

/// 当前请求的访问授权
#[derive(Debug, Clone)]
pub struct AccessGrant {
    /// 管理员为 None
    pub expires_at: Option<DateTime<Utc>>,
}

impl<S, B> Transform<S, ServiceRequest> for RequireAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAccessMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAccessMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAccessMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let Some(user) = req.extensions().get::<User>().cloned() else {
                info!("Access check without authenticated user. Apply RequireJWT first.");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if user.is_admin() {
                req.extensions_mut().insert(AccessGrant { expires_at: None });
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                error!("Storage not found in app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorCode::ServiceUnavailable,
                        "Service unavailable",
                    )
                    .map_into_right_body(),
                ));
            };

            match storage
                .find_active_access(user.id, Utc::now().timestamp())
                .await
            {
                Ok(Some(payment)) => {
                    debug!("User {} has access until {}", user.id, payment.expires_at);
                    req.extensions_mut().insert(AccessGrant {
                        expires_at: Some(payment.expires_at),
                    });
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Ok(None) => {
                    info!("User {} has no active access for {}", user.id, req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::PAYMENT_REQUIRED,
                            ErrorCode::AccessRequired,
                            "An active access payment is required",
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(e) => {
                    error!("Failed to check access for user {}: {}", user.id, e);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to check access",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
