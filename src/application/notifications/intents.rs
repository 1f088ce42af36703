//! Intent builders - map lifecycle events to notification intents.
//!
//! Each builder returns zero or more intents; a missing email address or
//! chat subscriber id simply drops that channel.

use std::collections::HashMap;

use crate::domain::notifications::{NotificationIntent, TemplateKey};
use crate::domain::scheduling::{
    Appointment, AppointmentStatus, Professional, Service, UserAccount,
};

/// Everything the builders need to describe an appointment event.
pub struct AppointmentContext<'a> {
    pub appointment: &'a Appointment,
    pub client: Option<&'a UserAccount>,
    pub professional: Option<&'a Professional>,
    pub services: &'a [Service],
}

fn format_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Formats a cent amount as a decimal string (`2500` -> `25.00`).
pub fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

fn appointment_vars(ctx: &AppointmentContext<'_>) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert(
        "client_name".to_string(),
        ctx.client.map(|c| c.name.clone()).unwrap_or_default(),
    );
    vars.insert("date".to_string(), ctx.appointment.date.date().to_string());
    vars.insert(
        "time".to_string(),
        format_time(ctx.appointment.date.minutes_of_day()),
    );
    vars.insert(
        "services".to_string(),
        ctx.services
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(pro) = ctx.professional {
        vars.insert("professional_name".to_string(), pro.name.clone());
    }
    vars
}

fn client_pair(ctx: &AppointmentContext<'_>, key: TemplateKey) -> Vec<NotificationIntent> {
    let tenant_id = ctx.appointment.tenant_id;
    let vars = appointment_vars(ctx);
    let mut intents = Vec::new();

    if let Some(client) = ctx.client {
        if let Some(subscriber) = &client.chat_subscriber_id {
            intents.push(NotificationIntent::chat(
                tenant_id,
                subscriber,
                key,
                vars.clone(),
            ));
        }
        if let Some(email) = &client.email {
            intents.push(NotificationIntent::email(tenant_id, email, key, vars));
        }
    }
    intents
}

fn professional_email(
    ctx: &AppointmentContext<'_>,
    key: TemplateKey,
) -> Option<NotificationIntent> {
    let pro = ctx.professional?;
    let email = pro.email.as_ref()?;
    Some(NotificationIntent::email(
        ctx.appointment.tenant_id,
        email,
        key,
        appointment_vars(ctx),
    ))
}

/// Notifications for a booking confirmed at creation time: client pair plus
/// an admin-facing email to the assigned professional.
pub fn booking_confirmed(ctx: &AppointmentContext<'_>) -> Vec<NotificationIntent> {
    let mut intents = client_pair(ctx, TemplateKey::AppointmentConfirmation);
    intents.extend(professional_email(ctx, TemplateKey::NewAppointmentAdmin));
    intents
}

/// Status-specific notifications for a lifecycle transition.
///
/// Confirmation and cancellation are the transitions clients hear about;
/// cancellation additionally notifies the assigned professional.
pub fn status_changed(
    ctx: &AppointmentContext<'_>,
    new_status: AppointmentStatus,
) -> Vec<NotificationIntent> {
    match new_status {
        AppointmentStatus::Confirmed => client_pair(ctx, TemplateKey::AppointmentConfirmation),
        AppointmentStatus::Canceled => {
            let mut intents = client_pair(ctx, TemplateKey::AppointmentCancellation);
            intents.extend(professional_email(ctx, TemplateKey::AppointmentCancelledAdmin));
            intents
        }
        AppointmentStatus::Pending | AppointmentStatus::Completed => Vec::new(),
    }
}

/// Payment settled: chat + email to the payer.
pub fn payment_confirmed(client: &UserAccount, amount_cents: i64) -> Vec<NotificationIntent> {
    let mut vars = HashMap::new();
    vars.insert("client_name".to_string(), client.name.clone());
    vars.insert("amount".to_string(), format_amount(amount_cents));

    let mut intents = Vec::new();
    if let Some(subscriber) = &client.chat_subscriber_id {
        intents.push(NotificationIntent::chat(
            client.tenant_id,
            subscriber,
            TemplateKey::PaymentConfirmation,
            vars.clone(),
        ));
    }
    if let Some(email) = &client.email {
        intents.push(NotificationIntent::email(
            client.tenant_id,
            email,
            TemplateKey::PaymentConfirmation,
            vars,
        ));
    }
    intents
}

/// Subscription activated: chat + email to the subscriber.
pub fn subscription_created(client: &UserAccount, plan_name: &str) -> Vec<NotificationIntent> {
    let mut vars = HashMap::new();
    vars.insert("client_name".to_string(), client.name.clone());
    vars.insert("plan_name".to_string(), plan_name.to_string());

    let mut intents = Vec::new();
    if let Some(subscriber) = &client.chat_subscriber_id {
        intents.push(NotificationIntent::chat(
            client.tenant_id,
            subscriber,
            TemplateKey::SubscriptionCreated,
            vars.clone(),
        ));
    }
    if let Some(email) = &client.email {
        intents.push(NotificationIntent::email(
            client.tenant_id,
            email,
            TemplateKey::SubscriptionCreated,
            vars,
        ));
    }
    intents
}
