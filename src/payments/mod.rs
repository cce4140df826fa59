pub mod razorpay;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::AppResult;

pub use razorpay::RazorpayClient;

type HmacSha256 = Hmac<Sha256>;

/// Gateway order handle returned to the client so it can drive checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub status: String,
    pub amount: i64,
}

impl GatewayPayment {
    /// Only captured payments have actually collected funds; refunding
    /// anything else is rejected upstream.
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRefund {
    pub id: String,
    pub payment_id: String,
    pub amount: i64,
    pub status: String,
}

/// The payment gateway seam. Constructed once at startup and passed into
/// the booking handlers through `AppState`, so tests can substitute a fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order. `amount_minor` is in the currency's minor
    /// unit (paise for INR).
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> AppResult<GatewayOrder>;

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<GatewayPayment>;

    /// Issue a partial refund of `amount_minor` against a captured payment.
    async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: i64,
        reason: &str,
        booking_id: Uuid,
    ) -> AppResult<GatewayRefund>;
}

fn compute_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check that a checkout callback was genuinely signed by the gateway:
/// HMAC-SHA256 over `order_id + "|" + payment_id` with the shared secret,
/// hex-encoded, compared in constant time. A mismatch means the booking is
/// never created.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let expected = compute_signature(order_id, payment_id, secret);
    expected.as_bytes().ct_eq(signature.as_bytes()).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_genuine_signature() {
        let sig = compute_signature("order_abc", "pay_xyz", "shhh");
        assert!(verify_payment_signature("order_abc", "pay_xyz", &sig, "shhh"));
    }

    #[test]
    fn rejects_tampered_signature() {
        let mut sig = compute_signature("order_abc", "pay_xyz", "shhh");
        // Flip the last hex digit.
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        assert!(!verify_payment_signature("order_abc", "pay_xyz", &sig, "shhh"));
    }

    #[test]
    fn rejects_signature_for_other_payment() {
        let sig = compute_signature("order_abc", "pay_xyz", "shhh");
        assert!(!verify_payment_signature("order_abc", "pay_other", &sig, "shhh"));
        assert!(!verify_payment_signature("order_other", "pay_xyz", &sig, "shhh"));
    }

    #[test]
    fn rejects_wrong_secret_and_length() {
        let sig = compute_signature("order_abc", "pay_xyz", "shhh");
        assert!(!verify_payment_signature("order_abc", "pay_xyz", &sig, "other-secret"));
        assert!(!verify_payment_signature("order_abc", "pay_xyz", "", "shhh"));
    }

    #[test]
    fn captured_is_the_only_refundable_state() {
        let captured = GatewayPayment {
            id: "pay_1".into(),
            status: "captured".into(),
            amount: 4000,
        };
        let authorized = GatewayPayment {
            id: "pay_2".into(),
            status: "authorized".into(),
            amount: 4000,
        };
        assert!(captured.is_captured());
        assert!(!authorized.is_captured());
    }
}
