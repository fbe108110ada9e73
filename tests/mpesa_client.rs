use rust_paperhub::config::MpesaConfig;
use rust_paperhub::errors::PaperHubError;
use rust_paperhub::services::payments::mpesa::{MpesaClient, StkPushRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base_urls: Vec<String>) -> MpesaConfig {
    MpesaConfig {
        base_urls,
        consumer_key: "key".to_string(),
        consumer_secret: "secret".to_string(),
        shortcode: "174379".to_string(),
        passkey: "passkey".to_string(),
        callback_url: "https://example.com/api/v1/payments/mpesa/callback".to_string(),
        callback_secret: String::new(),
        amount: 10.0,
        currency: "KES".to_string(),
        transaction_desc: "Past Papers Access".to_string(),
        timeout: 5,
    }
}

fn request() -> StkPushRequest<'static> {
    StkPushRequest {
        payment_id: "3f2a9c1e-0000-4000-8000-00000a1b2c3d",
        phone_number: "254712345678",
        amount: 10.0,
    }
}

async fn mount_oauth(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .and(query_param("grant_type", "client_credentials"))
        .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": "3599"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn stk_push_returns_checkout_ids() {
    let server = MockServer::start().await;
    mount_oauth(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "BusinessShortCode": "174379",
            "TransactionType": "CustomerPayBillOnline",
            "Amount": 10,
            "PartyA": "254712345678",
            "PartyB": "174379",
            "PhoneNumber": "254712345678",
            "CallBackURL": "https://example.com/api/v1/payments/mpesa/callback",
            "AccountReference": "PAPER0A1B2C3D"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": "ws_CO_191220191020363925",
            "ResponseCode": "0",
            "ResponseDescription": "Success. Request accepted for processing",
            "CustomerMessage": "Success. Request accepted for processing"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(vec![server.uri()])).unwrap();
    let accepted = client.stk_push(&request()).await.unwrap();
    assert_eq!(accepted.merchant_request_id, "29115-34620561-1");
    assert_eq!(accepted.checkout_request_id, "ws_CO_191220191020363925");
    assert_eq!(
        accepted.customer_message,
        "Success. Request accepted for processing"
    );

    // 第二次请求复用缓存的令牌（oauth 只被调用一次）
    client.stk_push(&request()).await.unwrap();
}

#[tokio::test]
async fn non_zero_response_code_is_an_error() {
    let server = MockServer::start().await;
    mount_oauth(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MerchantRequestID": "",
            "CheckoutRequestID": "",
            "ResponseCode": "1",
            "ResponseDescription": "Invalid PhoneNumber"
        })))
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(vec![server.uri()])).unwrap();
    let err = client.stk_push(&request()).await.unwrap_err();
    assert!(matches!(err, PaperHubError::PaymentGateway(_)));
    assert!(err.message().contains("Invalid PhoneNumber"));
}

#[tokio::test]
async fn falls_back_to_next_base_url() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&broken)
        .await;

    let healthy = MockServer::start().await;
    mount_oauth(&healthy, 1).await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MerchantRequestID": "m-1",
            "CheckoutRequestID": "c-1",
            "ResponseCode": "0",
            "ResponseDescription": "Accepted",
            "CustomerMessage": "Accepted"
        })))
        .expect(1)
        .mount(&healthy)
        .await;

    let client = MpesaClient::new(config(vec![broken.uri(), healthy.uri()])).unwrap();
    let accepted = client.stk_push(&request()).await.unwrap();
    assert_eq!(accepted.checkout_request_id, "c-1");
}

#[tokio::test]
async fn unauthorized_push_clears_cached_token() {
    let server = MockServer::start().await;
    mount_oauth(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Access Token"))
        .expect(2)
        .mount(&server)
        .await;

    let client = MpesaClient::new(config(vec![server.uri()])).unwrap();
    assert!(client.stk_push(&request()).await.is_err());
    // 令牌被作废后重新申请
    assert!(client.stk_push(&request()).await.is_err());
}
