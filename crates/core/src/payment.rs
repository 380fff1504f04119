//! Payment boundary - webhook verification and the payment-confirmation
//! capability the assembler's callers gate on.
//!
//! The core never creates orders or talks to the payment provider; it
//! only defines the contract. Confirmation state is owned by an external
//! store behind [`PaymentLedger`], never by process-global memory.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::error::{Result, SignError};

type HmacSha256 = Hmac<Sha256>;

/// Externally owned payment-confirmation store, keyed by order id.
///
/// Callers must check `is_paid` before invoking document assembly; the
/// core has no opinion on how the confirmation was obtained.
pub trait PaymentLedger: Send + Sync {
    fn mark_paid(&self, order_id: &str);
    fn is_paid(&self, order_id: &str) -> bool;
}

/// Verify the provider's webhook signature: hex-encoded HMAC-SHA256 of
/// the exact raw body under the shared webhook secret.
///
/// Returns false for a bad signature, malformed hex, or an empty secret;
/// verification failure is a rejection, not an error. Comparison is
/// constant-time via the MAC verifier.
pub fn verify_webhook_signature(secret: &[u8], raw_body: &[u8], signature_hex: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(raw_body);
    mac.verify_slice(&expected).is_ok()
}

/// A webhook event the service reacts to. Amounts are in minor currency
/// units (paise) exactly as the provider sends them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A payment link was fully paid; `link_id` doubles as the order id.
    LinkPaid { link_id: String, amount: i64 },
    /// A direct order payment was captured.
    Captured {
        order_id: String,
        payment_id: String,
        amount: i64,
    },
    /// A payment attempt failed.
    Failed {
        order_id: String,
        description: Option<String>,
    },
    /// Any event type this service does not handle.
    Other(String),
}

/// Parse a verified webhook body into a [`PaymentEvent`].
///
/// Call only after [`verify_webhook_signature`] accepted the body.
pub fn parse_event(raw_body: &[u8]) -> Result<PaymentEvent> {
    let value: Value = serde_json::from_slice(raw_body)
        .map_err(|err| SignError::InvalidPayload(format!("webhook body is not JSON: {err}")))?;
    let event_name = value["event"]
        .as_str()
        .ok_or_else(|| SignError::InvalidPayload("webhook body has no event field".into()))?;

    match event_name {
        "payment_link.paid" => {
            let entity = &value["payload"]["payment_link"]["entity"];
            Ok(PaymentEvent::LinkPaid {
                link_id: required_str(entity, "id")?,
                amount: entity["amount"].as_i64().unwrap_or(0),
            })
        }
        "payment.captured" => {
            let entity = &value["payload"]["payment"]["entity"];
            Ok(PaymentEvent::Captured {
                order_id: required_str(entity, "order_id")?,
                payment_id: required_str(entity, "id")?,
                amount: entity["amount"].as_i64().unwrap_or(0),
            })
        }
        "payment.failed" => {
            let entity = &value["payload"]["payment"]["entity"];
            Ok(PaymentEvent::Failed {
                order_id: required_str(entity, "order_id")?,
                description: entity["error_description"].as_str().map(str::to_owned),
            })
        }
        other => Ok(PaymentEvent::Other(other.to_owned())),
    }
}

fn required_str(entity: &Value, field: &str) -> Result<String> {
    entity[field]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| SignError::InvalidPayload(format!("event entity missing {field}")))
}
