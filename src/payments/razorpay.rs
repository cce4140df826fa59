use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

use super::{GatewayOrder, GatewayPayment, GatewayRefund, PaymentGateway};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the Razorpay gateway. Authenticates with the key pair
/// via basic auth; all failures (transport, timeout, non-2xx, bad body)
/// surface as `AppError::Upstream` so callers leave local state untouched.
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Serialize)]
struct RefundBody<'a> {
    amount: i64,
    notes: RefundNotes<'a>,
}

#[derive(Serialize)]
struct RefundNotes<'a> {
    reason: &'a str,
    booking_id: Uuid,
}

impl RazorpayClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            base_url: config.razorpay_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("gateway request failed: {}", e)))?;

        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("gateway request failed: {}", e)))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "gateway returned {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("gateway response decode failed: {}", e)))
    }
}

#[async_trait::async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder> {
        let body = CreateOrderBody {
            amount: amount_minor,
            currency,
            receipt,
        };

        self.post("/orders", &body).await
    }

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<GatewayPayment> {
        self.get(&format!("/payments/{}", payment_id)).await
    }

    async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: i64,
        reason: &str,
        booking_id: Uuid,
    ) -> AppResult<GatewayRefund> {
        let body = RefundBody {
            amount: amount_minor,
            notes: RefundNotes { reason, booking_id },
        };

        let refund: GatewayRefund = self
            .post(&format!("/payments/{}/refund", payment_id), &body)
            .await?;

        tracing::info!(
            payment_id = %payment_id,
            refund_id = %refund.id,
            amount_minor = amount_minor,
            "refund issued"
        );

        Ok(refund)
    }
}
