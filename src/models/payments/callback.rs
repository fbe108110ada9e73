//! Daraja STK push 回调报文

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: Option<StkCallbackBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: Option<StkCallback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    pub result_code: i64,
    #[serde(default)]
    pub result_desc: String,
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: Option<serde_json::Value>,
}

/// 解析后的回调结果
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackOutcome {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub result_code: i32,
    pub result_desc: String,
    pub receipt_number: Option<String>,
    pub amount: Option<f64>,
    pub phone_number: Option<String>,
}

impl CallbackOutcome {
    pub fn is_success(&self) -> bool {
        self.result_code == 0
    }
}

impl StkCallbackEnvelope {
    /// 取出 stkCallback；缺失时返回 None
    pub fn into_outcome(self) -> Option<CallbackOutcome> {
        let cb = self.body?.stk_callback?;
        let success = cb.result_code == 0;
        let item = |name: &str| -> Option<&serde_json::Value> {
            cb.callback_metadata
                .as_ref()?
                .items
                .iter()
                .find(|i| i.name == name)?
                .value
                .as_ref()
        };
        let as_text = |v: &serde_json::Value| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        let (receipt_number, amount, phone_number) = if success {
            (
                item("MpesaReceiptNumber").and_then(as_text),
                item("Amount").and_then(|v| {
                    v.as_f64()
                        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                }),
                item("PhoneNumber").and_then(as_text),
            )
        } else {
            (None, None, None)
        };

        Some(CallbackOutcome {
            merchant_request_id: cb.merchant_request_id,
            checkout_request_id: cb.checkout_request_id,
            result_code: i32::try_from(cb.result_code).unwrap_or(i32::MAX),
            result_desc: cb.result_desc,
            receipt_number,
            amount,
            phone_number,
        })
    }
}

/// 回调应答，网关只关心 ResultCode
#[derive(Debug, Clone, Serialize)]
pub struct CallbackAck {
    #[serde(rename = "ResultCode")]
    pub result_code: i32,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
}

impl CallbackAck {
    pub fn accepted() -> Self {
        Self {
            result_code: 0,
            result_desc: "Accepted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_callback() {
        let body = serde_json::json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_191220191020363925",
                    "ResultCode": 0,
                    "ResultDesc": "The service request is processed successfully.",
                    "CallbackMetadata": {
                        "Item": [
                            {"Name": "Amount", "Value": 10.00},
                            {"Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV"},
                            {"Name": "Balance"},
                            {"Name": "TransactionDate", "Value": 20191219102115u64},
                            {"Name": "PhoneNumber", "Value": 254708374149u64}
                        ]
                    }
                }
            }
        });
        let envelope: StkCallbackEnvelope = serde_json::from_value(body).unwrap();
        let outcome = envelope.into_outcome().unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.checkout_request_id, "ws_CO_191220191020363925");
        assert_eq!(outcome.receipt_number.as_deref(), Some("NLJ7RT61SV"));
        assert_eq!(outcome.amount, Some(10.0));
        assert_eq!(outcome.phone_number.as_deref(), Some("254708374149"));
    }

    #[test]
    fn test_cancelled_callback() {
        let body = serde_json::json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "8555-67195-1",
                    "CheckoutRequestID": "ws_CO_27072017151044001",
                    "ResultCode": 1032,
                    "ResultDesc": "Request cancelled by user"
                }
            }
        });
        let envelope: StkCallbackEnvelope = serde_json::from_value(body).unwrap();
        let outcome = envelope.into_outcome().unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.result_code, 1032);
        assert!(outcome.receipt_number.is_none());
    }

    #[test]
    fn test_missing_stk_callback() {
        let envelope: StkCallbackEnvelope =
            serde_json::from_value(serde_json::json!({"Body": {}})).unwrap();
        assert!(envelope.into_outcome().is_none());

        let envelope: StkCallbackEnvelope =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(envelope.into_outcome().is_none());
    }

    #[test]
    fn test_ack_shape() {
        let json = serde_json::to_value(CallbackAck::accepted()).unwrap();
        assert_eq!(json, serde_json::json!({"ResultCode": 0, "ResultDesc": "Accepted"}));
    }
}
