//! Chat command webhook - translates chat-platform actions into engine
//! calls.
//!
//! The chat bot acts as a service caller on behalf of the subscriber;
//! unknown actions are acknowledged with `{"status": "ignored"}` so the
//! platform never retries them.

use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use crate::application::scheduling::{
    AvailableSlotsQuery, CreateAppointmentCommand, ListAppointmentsQuery,
};
use crate::domain::billing::PaymentMethod;
use crate::domain::foundation::{
    ProfessionalId, Requester, ServiceId, TenantId, Timestamp, UserId,
};

use super::super::scheduling::dto::AppointmentResponse;
use super::super::{ApiError, AppState};
use super::dto::ChatWebhookRequest;

fn tenant_from(request: &ChatWebhookRequest, headers: &HeaderMap) -> Option<TenantId> {
    request
        .tenant_id
        .or_else(|| {
            headers
                .get("x-tenant-id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<Uuid>().ok())
        })
        .map(TenantId::from_uuid)
}

/// POST /integrations/chat/webhook
pub async fn chat_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatWebhookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let action = request.action.clone();
    let tenant_id = match tenant_from(&request, &headers) {
        Some(tenant_id) => tenant_id,
        None => {
            // Without a tenant there is nothing to act on; unknown actions
            // are still just ignored.
            if is_known_action(&action) {
                return Err(ApiError::bad_request("tenant_id is required"));
            }
            return Ok(Json(json!({ "status": "ignored" })));
        }
    };

    tracing::debug!(tenant_id = %tenant_id, action = %action, "Chat action received");

    match action.as_str() {
        "check_availability" => {
            let date = request
                .date
                .ok_or_else(|| ApiError::bad_request("date is required"))?;
            let slots = state
                .available_slots_handler()
                .handle(AvailableSlotsQuery {
                    tenant_id,
                    date,
                    service_id: request.service_id.map(ServiceId::from_uuid),
                    professional_id: request.professional_id.map(ProfessionalId::from_uuid),
                })
                .await?;
            Ok(Json(json!({ "slots": slots })))
        }

        "create_appointment" => {
            let user_id = request
                .user_id
                .map(UserId::from_uuid)
                .ok_or_else(|| ApiError::bad_request("user_id is required"))?;
            let datetime = request
                .datetime
                .ok_or_else(|| ApiError::bad_request("datetime is required"))?;
            let appointment = state
                .create_appointment_handler()
                .handle(CreateAppointmentCommand {
                    tenant_id,
                    user_id,
                    professional_id: request.professional_id.map(ProfessionalId::from_uuid),
                    location_id: None,
                    date: Timestamp::from_datetime(datetime),
                    payment_method: request.payment_method.unwrap_or(PaymentMethod::Cash),
                    service_ids: request
                        .service_ids
                        .iter()
                        .copied()
                        .map(ServiceId::from_uuid)
                        .collect(),
                })
                .await?;
            Ok(Json(json!({
                "status": "created",
                "appointment": AppointmentResponse::from(appointment),
            })))
        }

        "get_services" => {
            let services = state.catalog.list_services(tenant_id).await?;
            let services: Vec<_> = services
                .iter()
                .map(|s| {
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "duration_minutes": s.duration_minutes,
                        "price_cents": s.price_cents,
                    })
                })
                .collect();
            Ok(Json(json!({ "services": services })))
        }

        "get_professionals" => {
            let professionals = state.catalog.list_professionals(tenant_id).await?;
            let professionals: Vec<_> = professionals
                .iter()
                .map(|p| json!({ "id": p.id, "name": p.name }))
                .collect();
            Ok(Json(json!({ "professionals": professionals })))
        }

        "get_user_appointments" => {
            let user_id = request
                .user_id
                .map(UserId::from_uuid)
                .ok_or_else(|| ApiError::bad_request("user_id is required"))?;
            let result = state
                .list_appointments_handler()
                .handle(ListAppointmentsQuery {
                    tenant_id,
                    date: None,
                    page: None,
                    limit: None,
                    // The bot asks on the subscriber's behalf: client scope.
                    requester: Requester::client(user_id),
                })
                .await?;
            let appointments: Vec<AppointmentResponse> = match result {
                crate::application::scheduling::ListAppointmentsResult::Full(data) => {
                    data.into_iter().map(AppointmentResponse::from).collect()
                }
                crate::application::scheduling::ListAppointmentsResult::Paginated {
                    data, ..
                } => data.into_iter().map(AppointmentResponse::from).collect(),
            };
            Ok(Json(json!({ "appointments": appointments })))
        }

        _ => Ok(Json(json!({ "status": "ignored" }))),
    }
}

fn is_known_action(action: &str) -> bool {
    matches!(
        action,
        "check_availability"
            | "create_appointment"
            | "get_services"
            | "get_professionals"
            | "get_user_appointments"
    )
}
