//! Daraja (M-Pesa) API 客户端
//!
//! 负责 OAuth 令牌与 STK push。`base_urls` 按顺序尝试，第一个成功的生效；
//! 令牌按地址缓存，过期前一分钟刷新。

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::MpesaConfig;
use crate::errors::{PaperHubError, Result};

const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3599;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// STK push 入参
#[derive(Debug, Clone)]
pub struct StkPushRequest<'a> {
    pub payment_id: &'a str,
    pub phone_number: &'a str,
    pub amount: f64,
}

/// 网关已受理的 STK push
#[derive(Debug, Clone, PartialEq)]
pub struct StkPushAccepted {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub customer_message: String,
}

struct CachedToken {
    base_url: String,
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct MpesaClient {
    http: reqwest::Client,
    config: MpesaConfig,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    // Daraja 返回字符串形式的秒数
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushBody<'a> {
    business_short_code: &'a str,
    password: String,
    timestamp: String,
    transaction_type: &'static str,
    amount: i64,
    party_a: &'a str,
    party_b: &'a str,
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    callback_url: &'a str,
    account_reference: String,
    transaction_desc: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushResponse {
    #[serde(rename = "MerchantRequestID", default)]
    merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID", default)]
    checkout_request_id: String,
    #[serde(default)]
    response_code: String,
    #[serde(default)]
    response_description: String,
    #[serde(default)]
    customer_message: String,
}

/// `YYYYMMDDHHmmss`
pub fn stk_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// base64(shortcode + passkey + timestamp)
pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// "PAPER" + 支付 ID 末 8 位（大写）
pub fn account_reference(payment_id: &str) -> String {
    let chars: Vec<char> = payment_id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
    format!("PAPER{}", tail.to_uppercase())
}

fn token_ttl(value: Option<&serde_json::Value>) -> i64 {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()))
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
}

impl MpesaClient {
    pub fn new(config: MpesaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout.max(1)))
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PaperHubError::payment_gateway(format!("HTTP 客户端创建失败: {e}")))?;

        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    /// 发起 STK push，依次尝试配置的地址
    pub async fn stk_push(&self, req: &StkPushRequest<'_>) -> Result<StkPushAccepted> {
        let mut last_error = PaperHubError::payment_gateway("No M-Pesa endpoint configured");

        for base_url in &self.config.base_urls {
            let base_url = base_url.trim_end_matches('/');
            match self.stk_push_at(base_url, req).await {
                Ok(accepted) => return Ok(accepted),
                Err(e) => {
                    tracing::warn!("STK push via {} failed: {}", base_url, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn stk_push_at(&self, base_url: &str, req: &StkPushRequest<'_>) -> Result<StkPushAccepted> {
        let token = self.access_token(base_url).await?;
        let timestamp = stk_timestamp(Utc::now());
        let shortcode = self.config.shortcode.as_str();

        let body = StkPushBody {
            business_short_code: shortcode,
            password: stk_password(shortcode, &self.config.passkey, &timestamp),
            timestamp,
            transaction_type: "CustomerPayBillOnline",
            amount: (req.amount.floor() as i64).max(1),
            party_a: req.phone_number,
            party_b: shortcode,
            phone_number: req.phone_number,
            callback_url: &self.config.callback_url,
            account_reference: account_reference(req.payment_id),
            transaction_desc: &self.config.transaction_desc,
        };

        let response = self
            .http
            .post(format!("{base_url}/mpesa/stkpush/v1/processrequest"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaperHubError::payment_gateway(format!("STK push request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaperHubError::payment_gateway(format!("STK push read failed: {e}")))?;
        if !status.is_success() {
            // 令牌可能已被网关作废
            if status == reqwest::StatusCode::UNAUTHORIZED {
                *self.token.write().await = None;
            }
            return Err(PaperHubError::payment_gateway(format!(
                "STK push rejected ({status}): {text}"
            )));
        }

        let parsed: StkPushResponse = serde_json::from_str(&text)
            .map_err(|e| PaperHubError::payment_gateway(format!("STK push response invalid: {e}")))?;
        if parsed.response_code != "0" {
            return Err(PaperHubError::payment_gateway(format!(
                "STK push error: {}",
                if parsed.response_description.is_empty() {
                    "Unknown error"
                } else {
                    &parsed.response_description
                }
            )));
        }

        Ok(StkPushAccepted {
            merchant_request_id: parsed.merchant_request_id,
            checkout_request_id: parsed.checkout_request_id,
            customer_message: parsed.customer_message,
        })
    }

    async fn access_token(&self, base_url: &str) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref()
                && token.base_url == base_url
                && token.expires_at > Utc::now()
            {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        // 等锁期间可能已被其他请求刷新
        if let Some(token) = slot.as_ref()
            && token.base_url == base_url
            && token.expires_at > Utc::now()
        {
            return Ok(token.value.clone());
        }

        let response = self
            .http
            .get(format!("{base_url}/oauth/v1/generate"))
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await
            .map_err(|e| PaperHubError::payment_gateway(format!("OAuth request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PaperHubError::payment_gateway(format!(
                "OAuth rejected ({status}): {text}"
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| PaperHubError::payment_gateway(format!("OAuth response invalid: {e}")))?;

        let ttl = token_ttl(parsed.expires_in.as_ref());
        let expires_at =
            Utc::now() + Duration::seconds((ttl - TOKEN_REFRESH_MARGIN_SECS).max(0));
        tracing::debug!("Obtained M-Pesa access token from {}", base_url);

        *slot = Some(CachedToken {
            base_url: base_url.to_string(),
            value: parsed.access_token.clone(),
            expires_at,
        });
        Ok(parsed.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(stk_timestamp(at), "20240307090501");
    }

    #[test]
    fn test_password_is_base64_of_concatenation() {
        let password = stk_password("174379", "passkey", "20240307090501");
        let decoded = STANDARD.decode(password).unwrap();
        assert_eq!(decoded, b"174379passkey20240307090501");
    }

    #[test]
    fn test_account_reference() {
        assert_eq!(
            account_reference("0b6d3c1e-8f2a-4c55-9d0e-1a2b3c4d5e6f"),
            "PAPER3C4D5E6F"
        );
        assert_eq!(account_reference("abc"), "PAPERABC");
    }

    #[test]
    fn test_token_ttl_parsing() {
        assert_eq!(token_ttl(Some(&serde_json::json!("3599"))), 3599);
        assert_eq!(token_ttl(Some(&serde_json::json!(120))), 120);
        assert_eq!(token_ttl(None), DEFAULT_TOKEN_TTL_SECS);
    }
}
