//! Notification template registry.
//!
//! Two-level lookup: a tenant's template overrides win, the built-in
//! defaults fill the gaps. Rendering is plain `{{placeholder}}`
//! substitution; unknown placeholders are left in place.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Every notification the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKey {
    AppointmentConfirmation,
    AppointmentCancellation,
    AppointmentCancelledAdmin,
    NewAppointmentAdmin,
    PaymentConfirmation,
    PaymentFailed,
    SubscriptionCreated,
    SubscriptionStatusChanged,
    Welcome,
    PasswordReset,
    AppointmentReminder,
}

impl TemplateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::AppointmentConfirmation => "appointment_confirmation",
            TemplateKey::AppointmentCancellation => "appointment_cancellation",
            TemplateKey::AppointmentCancelledAdmin => "appointment_cancelled_admin",
            TemplateKey::NewAppointmentAdmin => "new_appointment_admin",
            TemplateKey::PaymentConfirmation => "payment_confirmation",
            TemplateKey::PaymentFailed => "payment_failed",
            TemplateKey::SubscriptionCreated => "subscription_created",
            TemplateKey::SubscriptionStatusChanged => "subscription_status_changed",
            TemplateKey::Welcome => "welcome",
            TemplateKey::PasswordReset => "password_reset",
            TemplateKey::AppointmentReminder => "appointment_reminder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appointment_confirmation" => Some(TemplateKey::AppointmentConfirmation),
            "appointment_cancellation" => Some(TemplateKey::AppointmentCancellation),
            "appointment_cancelled_admin" => Some(TemplateKey::AppointmentCancelledAdmin),
            "new_appointment_admin" => Some(TemplateKey::NewAppointmentAdmin),
            "payment_confirmation" => Some(TemplateKey::PaymentConfirmation),
            "payment_failed" => Some(TemplateKey::PaymentFailed),
            "subscription_created" => Some(TemplateKey::SubscriptionCreated),
            "subscription_status_changed" => Some(TemplateKey::SubscriptionStatusChanged),
            "welcome" => Some(TemplateKey::Welcome),
            "password_reset" => Some(TemplateKey::PasswordReset),
            "appointment_reminder" => Some(TemplateKey::AppointmentReminder),
            _ => None,
        }
    }
}

/// Subject and body of a notification message.
///
/// Chat deliveries use only the body; email uses both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

impl MessageTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

static DEFAULT_TEMPLATES: Lazy<HashMap<TemplateKey, MessageTemplate>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        TemplateKey::AppointmentConfirmation,
        MessageTemplate::new(
            "Your appointment is confirmed",
            "Hi {{client_name}}, your appointment on {{date}} at {{time}} is confirmed. See you soon!",
        ),
    );
    m.insert(
        TemplateKey::AppointmentCancellation,
        MessageTemplate::new(
            "Your appointment was canceled",
            "Hi {{client_name}}, your appointment on {{date}} at {{time}} has been canceled.",
        ),
    );
    m.insert(
        TemplateKey::AppointmentCancelledAdmin,
        MessageTemplate::new(
            "Appointment canceled",
            "The appointment with {{client_name}} on {{date}} at {{time}} was canceled.",
        ),
    );
    m.insert(
        TemplateKey::NewAppointmentAdmin,
        MessageTemplate::new(
            "New appointment booked",
            "{{client_name}} booked {{services}} on {{date}} at {{time}}.",
        ),
    );
    m.insert(
        TemplateKey::PaymentConfirmation,
        MessageTemplate::new(
            "Payment received",
            "Hi {{client_name}}, we received your payment of {{amount}}. Thank you!",
        ),
    );
    m.insert(
        TemplateKey::PaymentFailed,
        MessageTemplate::new(
            "Payment failed",
            "Hi {{client_name}}, your payment of {{amount}} could not be processed.",
        ),
    );
    m.insert(
        TemplateKey::SubscriptionCreated,
        MessageTemplate::new(
            "Subscription active",
            "Hi {{client_name}}, your {{plan_name}} subscription is now active.",
        ),
    );
    m.insert(
        TemplateKey::SubscriptionStatusChanged,
        MessageTemplate::new(
            "Subscription updated",
            "Hi {{client_name}}, your subscription status is now {{status}}.",
        ),
    );
    m.insert(
        TemplateKey::Welcome,
        MessageTemplate::new(
            "Welcome to {{business_name}}",
            "Hi {{client_name}}, welcome aboard! You can book your first appointment any time.",
        ),
    );
    m.insert(
        TemplateKey::PasswordReset,
        MessageTemplate::new(
            "Reset your password",
            "Hi {{client_name}}, use this link to reset your password: {{reset_link}}",
        ),
    );
    m.insert(
        TemplateKey::AppointmentReminder,
        MessageTemplate::new(
            "Appointment reminder",
            "Hi {{client_name}}, a reminder of your appointment on {{date}} at {{time}}.",
        ),
    );
    m
});

/// Resolves a template: tenant override first, built-in default otherwise.
///
/// Overrides are keyed by the template key's string form, as stored in the
/// tenant's configuration blob.
pub fn resolve(
    key: TemplateKey,
    overrides: &HashMap<String, MessageTemplate>,
) -> MessageTemplate {
    overrides
        .get(key.as_str())
        .cloned()
        .unwrap_or_else(|| DEFAULT_TEMPLATES[&key].clone())
}

/// Substitutes `{{name}}` placeholders with the given variables.
pub fn render(text: &str, variables: &HashMap<String, String>) -> String {
    let mut out = text.to_string();
    for (name, value) in variables {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}
