use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use actix_web::{App, HttpResponse, http::StatusCode, test, web};
use chrono::Utc;
use rust_paperhub::config::DatabaseConfig;
use rust_paperhub::middlewares::{RequireAccess, RequireJWT};
use rust_paperhub::models::payments::{
    callback::CallbackOutcome,
    requests::{CreateMpesaTransactionRecord, CreatePaymentRecord},
};
use rust_paperhub::models::users::{entities::UserRole, requests::CreateUserRequest};
use rust_paperhub::routes;
use rust_paperhub::storage::Storage;
use rust_paperhub::storage::sea_orm_storage::SeaOrmStorage;
use rust_paperhub::utils::jwt::JwtUtils;
use serde_json::{Value, json};

const CALLBACK_SECRET: &str = "cb-secret";
const CALLBACK_PATH: &str = "/api/v1/payments/mpesa/callback";

static ENV: Once = Once::new();

// 配置在第一次读取时固定，必须先于任何请求设置
fn configure_env() {
    ENV.call_once(|| unsafe {
        std::env::set_var("MPESA_CALLBACK_SECRET", CALLBACK_SECRET);
        std::env::set_var("PAPERHUB_ACCESS__POLL_INTERVAL_SECS", "1");
        std::env::set_var("PAPERHUB_ACCESS__POLL_MAX_ATTEMPTS", "2");
    });
}

async fn storage() -> Arc<dyn Storage> {
    configure_env();
    let storage = SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory database");
    Arc::new(storage)
}

async fn user(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> (i64, String) {
    let created = storage
        .create_user(CreateUserRequest {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hashed".to_string(),
            role: role.clone(),
            display_name: None,
            avatar_url: None,
        })
        .await
        .expect("create user");
    let token = JwtUtils::generate_access_token(created.id, &role.to_string()).expect("token");
    (created.id, token)
}

async fn pending_payment(storage: &Arc<dyn Storage>, user_id: i64, checkout: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    storage
        .create_payment(CreatePaymentRecord {
            id: id.clone(),
            user_id,
            phone_number: "254712345678".to_string(),
            amount: 10.0,
            currency: "KES".to_string(),
            expires_at: Utc::now() + chrono::Duration::days(365),
        })
        .await
        .expect("create payment");
    storage
        .create_mpesa_transaction(CreateMpesaTransactionRecord {
            payment_id: id.clone(),
            merchant_request_id: format!("merchant-{checkout}"),
            checkout_request_id: checkout.to_string(),
            phone_number: "254712345678".to_string(),
            amount: 10.0,
        })
        .await
        .expect("create transaction");
    id
}

fn success(checkout: &str) -> CallbackOutcome {
    CallbackOutcome {
        merchant_request_id: format!("merchant-{checkout}"),
        checkout_request_id: checkout.to_string(),
        result_code: 0,
        result_desc: "The service request is processed successfully.".to_string(),
        receipt_number: Some("NLJ7RT61SV".to_string()),
        amount: Some(10.0),
        phone_number: Some("254712345678".to_string()),
    }
}

fn callback_body(checkout: &str) -> Value {
    json!({
        "Body": {
            "stkCallback": {
                "MerchantRequestID": format!("merchant-{checkout}"),
                "CheckoutRequestID": checkout,
                "ResultCode": 0,
                "ResultDesc": "The service request is processed successfully.",
                "CallbackMetadata": {
                    "Item": [
                        { "Name": "Amount", "Value": 10 },
                        { "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
                        { "Name": "PhoneNumber", "Value": 254712345678u64 }
                    ]
                }
            }
        }
    })
}

macro_rules! payment_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .configure(routes::configure_payment_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn callback_with_wrong_secret_is_forbidden() {
    let storage = storage().await;
    let app = payment_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("{CALLBACK_PATH}?secret=wrong"))
        .set_json(callback_body("ws_CO_101"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(CALLBACK_PATH)
        .set_json(callback_body("ws_CO_101"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn callback_without_stk_payload_is_bad_request() {
    let storage = storage().await;
    let app = payment_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("{CALLBACK_PATH}?secret={CALLBACK_SECRET}"))
        .set_json(json!({ "Body": {} }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn callback_for_unknown_checkout_is_not_found() {
    let storage = storage().await;
    let app = payment_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("{CALLBACK_PATH}?secret={CALLBACK_SECRET}"))
        .set_json(callback_body("ws_CO_missing"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn callback_settles_payment_and_acks() {
    let storage = storage().await;
    let (payer, _) = user(&storage, "ruth", UserRole::User).await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_102").await;
    let app = payment_app!(storage);

    let req = test::TestRequest::post()
        .uri(&format!("{CALLBACK_PATH}?secret={CALLBACK_SECRET}"))
        .set_json(callback_body("ws_CO_102"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ResultCode"], 0);

    let payment = storage.get_payment(&payment_id).await.unwrap().unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("NLJ7RT61SV"));
}

#[actix_web::test]
async fn await_returns_at_once_for_settled_payment() {
    let storage = storage().await;
    let (payer, token) = user(&storage, "sybil", UserRole::User).await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_103").await;
    storage
        .settle_payment_from_callback(&success("ws_CO_103"))
        .await
        .unwrap();
    let app = payment_app!(storage);

    let started = Instant::now();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/payments/{payment_id}/await"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(body["data"]["timed_out"], false);
    assert_eq!(body["data"]["payment"]["status"], "completed");
}

#[actix_web::test]
async fn await_times_out_while_pending() {
    let storage = storage().await;
    let (payer, token) = user(&storage, "trent", UserRole::User).await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_104").await;
    let app = payment_app!(storage);

    let started = Instant::now();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/payments/{payment_id}/await"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // 两次 1 秒轮询
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(body["data"]["timed_out"], true);
    assert_eq!(body["data"]["payment"]["status"], "pending");
}

#[actix_web::test]
async fn await_picks_up_settlement_during_wait() {
    let storage = storage().await;
    let (payer, token) = user(&storage, "ursula", UserRole::User).await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_105").await;
    let app = payment_app!(storage);

    let settler = storage.clone();
    actix_web::rt::spawn(async move {
        actix_web::rt::time::sleep(Duration::from_millis(300)).await;
        settler
            .settle_payment_from_callback(&success("ws_CO_105"))
            .await
            .unwrap();
    });

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/payments/{payment_id}/await"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["timed_out"], false);
    assert_eq!(body["data"]["payment"]["status"], "completed");
}

#[actix_web::test]
async fn await_hides_other_users_payments() {
    let storage = storage().await;
    let (payer, _) = user(&storage, "victor", UserRole::User).await;
    let (_, stranger) = user(&storage, "walter", UserRole::User).await;
    let payment_id = pending_payment(&storage, payer, "ws_CO_106").await;
    let app = payment_app!(storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/payments/{payment_id}/await"))
        .insert_header(("Authorization", format!("Bearer {stranger}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

macro_rules! guarded_app {
    ($storage:expr) => {
        test::init_service(
            App::new().app_data(web::Data::new($storage.clone())).service(
                web::resource("/guarded")
                    .wrap(RequireAccess)
                    .wrap(RequireJWT)
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await
    };
}

fn guarded(token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/guarded")
        .insert_header(("Authorization", format!("Bearer {token}")))
}

#[actix_web::test]
async fn access_requires_active_payment() {
    let storage = storage().await;
    let (payer, token) = user(&storage, "xavier", UserRole::User).await;
    let app = guarded_app!(storage);

    let resp = test::call_service(&app, guarded(&token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);

    // 待支付不算
    pending_payment(&storage, payer, "ws_CO_107").await;
    let resp = test::call_service(&app, guarded(&token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);

    storage
        .settle_payment_from_callback(&success("ws_CO_107"))
        .await
        .unwrap();
    let resp = test::call_service(&app, guarded(&token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn admins_bypass_access_check() {
    let storage = storage().await;
    let (_, token) = user(&storage, "yolanda", UserRole::Admin).await;
    let app = guarded_app!(storage);

    let resp = test::call_service(&app, guarded(&token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let storage = storage().await;
    let app = guarded_app!(storage);

    let req = test::TestRequest::get().uri("/guarded").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn paper_text_route_requires_payment() {
    let storage = storage().await;
    let (_, token) = user(&storage, "zara", UserRole::User).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .configure(routes::configure_paper_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/papers/1/text")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
}
