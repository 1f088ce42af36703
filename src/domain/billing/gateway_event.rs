//! Inbound payment-gateway webhook body.
//!
//! The gateway posts `{"type": "payment", "data": {"id": "..."}}` for
//! payment events, plus assorted test pings and non-payment topics that
//! must be acknowledged without touching the database.

use serde::Deserialize;

/// Raw webhook body as delivered by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayWebhook {
    /// Event topic (`payment`, `merchant_order`, ...).
    #[serde(rename = "type")]
    pub topic: Option<String>,

    /// Test-ping action identifier (`action.test.created`, ...).
    pub action: Option<String>,

    pub data: Option<GatewayWebhookData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayWebhookData {
    /// Gateway-side payment id, used to fetch the full payment.
    pub id: Option<String>,
}

/// Classification of a webhook body: process it or acknowledge-and-ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookKind {
    /// A payment event carrying the gateway payment id.
    Payment { payment_id: String },

    /// Anything that must be acknowledged without processing.
    Ignorable { reason: String },
}

impl GatewayWebhook {
    /// Decide whether this delivery is a processable payment event.
    ///
    /// Test pings and non-`payment` topics are ignorable; so is a payment
    /// event with no data id (nothing to fetch).
    pub fn classify(&self) -> WebhookKind {
        if let Some(action) = &self.action {
            if action.contains("test") {
                return WebhookKind::Ignorable {
                    reason: format!("test ping: {}", action),
                };
            }
        }

        match self.topic.as_deref() {
            Some("payment") => match self.data.as_ref().and_then(|d| d.id.clone()) {
                Some(payment_id) if !payment_id.is_empty() => WebhookKind::Payment { payment_id },
                _ => WebhookKind::Ignorable {
                    reason: "payment event without data.id".to_string(),
                },
            },
            Some(other) => WebhookKind::Ignorable {
                reason: format!("unhandled topic: {}", other),
            },
            None => WebhookKind::Ignorable {
                reason: "missing topic".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GatewayWebhook {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn payment_event_classifies_with_id() {
        let hook = parse(r#"{"type": "payment", "data": {"id": "12345"}}"#);
        assert_eq!(
            hook.classify(),
            WebhookKind::Payment {
                payment_id: "12345".to_string()
            }
        );
    }

    #[test]
    fn test_ping_is_ignorable() {
        let hook = parse(r#"{"action": "action.test.created", "type": "payment", "data": {"id": "1"}}"#);
        assert!(matches!(hook.classify(), WebhookKind::Ignorable { .. }));
    }

    #[test]
    fn non_payment_topic_is_ignorable() {
        let hook = parse(r#"{"type": "merchant_order", "data": {"id": "99"}}"#);
        assert!(matches!(hook.classify(), WebhookKind::Ignorable { .. }));
    }

    #[test]
    fn payment_without_data_id_is_ignorable() {
        let hook = parse(r#"{"type": "payment"}"#);
        assert!(matches!(hook.classify(), WebhookKind::Ignorable { .. }));
    }
}
