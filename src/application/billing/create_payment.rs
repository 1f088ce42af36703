//! CreatePaymentHandler - direct payment creation (cash, card, plan credit).
//!
//! Direct payments settle immediately: the record is created `Completed`.
//! Plan-credit payments consume one credit from the payer's active
//! subscription via a conditional decrement, so concurrent attempts cannot
//! overdraw it.

use std::sync::Arc;

use crate::application::notifications::{enqueue_quietly, intents};
use crate::domain::billing::{Payment, PaymentKind, PaymentMethod};
use crate::domain::foundation::{
    AppointmentId, DomainError, SubscriptionId, TenantId, UserId,
};
use crate::ports::{
    CatalogReader, NotificationOutbox, PaymentRepository, SubscriptionRepository, UserDirectory,
};

/// Command to create a direct payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub appointment_id: Option<AppointmentId>,
    pub subscription_id: Option<SubscriptionId>,
}

/// Handler for direct payment creation.
pub struct CreatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    catalog: Arc<dyn CatalogReader>,
    users: Arc<dyn UserDirectory>,
    outbox: Arc<dyn NotificationOutbox>,
}

impl CreatePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        catalog: Arc<dyn CatalogReader>,
        users: Arc<dyn UserDirectory>,
        outbox: Arc<dyn NotificationOutbox>,
    ) -> Self {
        Self {
            payments,
            subscriptions,
            catalog,
            users,
            outbox,
        }
    }

    pub async fn handle(&self, cmd: CreatePaymentCommand) -> Result<Payment, DomainError> {
        // 1. Plan credit: locate the active subscription and consume a credit.
        let mut linked_subscription = cmd.subscription_id;
        if cmd.method == PaymentMethod::PlanCredit {
            let subscription = self
                .subscriptions
                .find_active_with_credits(cmd.tenant_id, cmd.user_id)
                .await?
                .ok_or_else(|| {
                    DomainError::invalid_request(
                        "No active subscription with remaining credits",
                    )
                })?;

            // Conditional decrement; a false return means a concurrent
            // payment took the last credit between lookup and consume.
            let consumed = self
                .subscriptions
                .consume_credit(cmd.tenant_id, subscription.id)
                .await?;
            if !consumed {
                return Err(DomainError::invalid_request(
                    "Subscription has no remaining credits",
                ));
            }
            linked_subscription = Some(subscription.id);
        }

        // 2. Persist the settled payment.
        let kind = if cmd.subscription_id.is_some() {
            PaymentKind::Subscription
        } else {
            PaymentKind::Appointment
        };
        let payment = Payment::completed(
            cmd.tenant_id,
            cmd.user_id,
            cmd.amount_cents,
            cmd.method,
            kind,
            cmd.appointment_id,
            linked_subscription,
        );
        self.payments.insert(&payment).await?;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            payment_id = %payment.id,
            method = cmd.method.as_str(),
            amount_cents = cmd.amount_cents,
            "Payment created"
        );

        // 3. A paid-for subscription purchase activates the subscription.
        if let Some(subscription_id) = cmd.subscription_id {
            if cmd.method != PaymentMethod::PlanCredit {
                self.subscriptions
                    .activate(cmd.tenant_id, subscription_id)
                    .await?;
                self.notify_subscription_created(cmd.tenant_id, cmd.user_id, subscription_id)
                    .await;
            }
        }

        // 4. Payment confirmation to the payer, both channels.
        if let Ok(Some(client)) = self.users.user(cmd.tenant_id, cmd.user_id).await {
            enqueue_quietly(
                self.outbox.as_ref(),
                intents::payment_confirmed(&client, payment.amount_cents),
            )
            .await;
        }

        Ok(payment)
    }

    async fn notify_subscription_created(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        subscription_id: SubscriptionId,
    ) {
        let client = match self.users.user(tenant_id, user_id).await {
            Ok(Some(client)) => client,
            _ => return,
        };
        let plan_name = match self.subscriptions.find_by_id(tenant_id, subscription_id).await {
            Ok(Some(subscription)) => {
                match self.catalog.plan(tenant_id, subscription.plan_id).await {
                    Ok(Some(plan)) => plan.name,
                    _ => String::new(),
                }
            }
            _ => String::new(),
        };
        enqueue_quietly(
            self.outbox.as_ref(),
            intents::subscription_created(&client, &plan_name),
        )
        .await;
    }
}
