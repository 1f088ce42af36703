//! HTTP handlers for the payment endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::billing::{
    CreateCheckoutCommand, CreatePaymentCommand, ProcessWebhookCommand,
};
use crate::domain::billing::GatewayWebhook;
use crate::domain::foundation::{AppointmentId, SubscriptionId, TenantId, UserId};

use super::super::{ApiError, AppState, AuthenticatedRequester, TenantContext};
use super::dto::{
    CheckoutResponse, CreatePaymentRequest, PaymentResponse, WebhookParams, WebhookResponse,
};

/// POST /payments - direct payment (cash, card, plan credit)
pub async fn create_payment(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = match request.user_id {
        Some(id) => UserId::from_uuid(id),
        None => requester
            .user_id
            .ok_or_else(|| ApiError::bad_request("user_id is required"))?,
    };

    let handler = state.create_payment_handler();
    let payment = handler
        .handle(CreatePaymentCommand {
            tenant_id,
            user_id,
            amount_cents: request.amount_cents,
            method: request.method,
            appointment_id: request.appointment_id.map(AppointmentId::from_uuid),
            subscription_id: request.subscription_id.map(SubscriptionId::from_uuid),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// POST /payments/checkout/:appointment_id - hosted checkout session
pub async fn create_checkout(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Path(appointment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.checkout_handler();
    let session = handler
        .handle(CreateCheckoutCommand {
            tenant_id,
            appointment_id: AppointmentId::from_uuid(appointment_id),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            checkout_url: session.checkout_url,
        }),
    ))
}

/// POST /payments/webhook/:gateway?tenantId=...
///
/// Always `200` with `{"status": "received"|"ok"}`; the gateway must never
/// see an error it would retry into a storm, so even malformed deliveries
/// are acknowledged.
pub async fn payment_webhook(
    State(state): State<AppState>,
    Path(gateway): Path<String>,
    params: Option<Query<WebhookParams>>,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    let tenant_id = match params {
        Some(Query(params)) => TenantId::from_uuid(params.tenant_id),
        None => {
            tracing::warn!(gateway = %gateway, "Webhook without tenantId; acknowledging");
            return Json(WebhookResponse { status: "received" });
        }
    };

    let body: GatewayWebhook = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                gateway = %gateway,
                tenant_id = %tenant_id,
                error = %e,
                "Malformed webhook body; acknowledging"
            );
            return Json(WebhookResponse { status: "received" });
        }
    };

    tracing::debug!(gateway = %gateway, tenant_id = %tenant_id, "Webhook received");

    let handler = state.webhook_handler();
    let ack = handler
        .handle(ProcessWebhookCommand { tenant_id, body })
        .await;

    Json(WebhookResponse {
        status: ack.as_str(),
    })
}
