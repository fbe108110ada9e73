use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::payments::callback::StkCallbackEnvelope;
use crate::models::payments::requests::{
    CallbackQuery, InitiatePaymentRequest, PaymentListParams,
};
use crate::models::users::entities::UserRole;
use crate::services::PaymentService;
use crate::utils::SafePaymentId;

// 懒加载的全局 PaymentService 实例
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);

pub async fn initiate_payment(
    req: HttpRequest,
    body: web::Json<InitiatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .initiate_payment(body.into_inner(), &req)
        .await
}

pub async fn mpesa_callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    body: web::Json<StkCallbackEnvelope>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE
        .handle_callback(query.into_inner(), body.into_inner(), &req)
        .await
}

pub async fn payment_status(req: HttpRequest, id: SafePaymentId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.payment_status(id.0, &req).await
}

pub async fn await_payment(req: HttpRequest, id: SafePaymentId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.await_payment(id.0, &req).await
}

pub async fn check_access(req: HttpRequest) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.check_access(&req).await
}

pub async fn list_my_payments(req: HttpRequest) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_my_payments(&req).await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_payments(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/payments")
            // 网关回调不带用户凭据
            .route("/mpesa/callback", web::post().to(mpesa_callback))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/initiate")
                            .wrap(RateLimit::payment())
                            .route(web::post().to(initiate_payment)),
                    )
                    .route("/access", web::get().to(check_access))
                    .route("/mine", web::get().to(list_my_payments))
                    .service(
                        web::resource("/admin")
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                            .route(web::get().to(list_payments)),
                    )
                    .route("/{id}", web::get().to(payment_status))
                    .route("/{id}/await", web::get().to(await_payment)),
            ),
    );
}
