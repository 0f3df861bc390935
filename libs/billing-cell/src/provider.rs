use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use shared_config::AppConfig;

use crate::models::BillingError;

type HmacSha256 = Hmac<Sha256>;

/// Seam for the payment gateway. Orders are opaque references; callbacks
/// carry an HMAC-SHA256 signature over `"{order}|{payment}"` keyed by the
/// gateway secret.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_order(&self, amount_minor: i64, currency: &str) -> Result<String, BillingError>;

    fn verify_signature(
        &self,
        order_reference: &str,
        payment_reference: &str,
        signature: &str,
    ) -> bool;
}

pub struct GatewayProvider {
    key_secret: String,
}

impl GatewayProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            key_secret: config.payment_key_secret.clone(),
        }
    }
}

#[async_trait]
impl PaymentProvider for GatewayProvider {
    async fn create_order(
        &self,
        amount_minor: i64,
        _currency: &str,
    ) -> Result<String, BillingError> {
        if amount_minor <= 0 {
            return Err(BillingError::Validation(
                "Order amount must be positive".to_string(),
            ));
        }
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        Ok(format!("order_{}", hex::encode(bytes)))
    }

    fn verify_signature(
        &self,
        order_reference: &str,
        payment_reference: &str,
        signature: &str,
    ) -> bool {
        let mut mac = match HmacSha256::new_from_slice(self.key_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(format!("{}|{}", order_reference, payment_reference).as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());
        expected == signature
    }
}

/// Builds the signature a gateway would attach; used by tests and tooling.
pub fn sign_callback(key_secret: &str, order_reference: &str, payment_reference: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail in practice.
    match HmacSha256::new_from_slice(key_secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(format!("{}|{}", order_reference, payment_reference).as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let provider = GatewayProvider {
            key_secret: "gateway-secret".to_string(),
        };
        let signature = sign_callback("gateway-secret", "order_ab12", "pay_cd34");
        assert!(provider.verify_signature("order_ab12", "pay_cd34", &signature));
        assert!(!provider.verify_signature("order_ab12", "pay_cd34", "deadbeef"));
    }
}
