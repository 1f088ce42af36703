//! HTTP handlers for the appointment endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::scheduling::{
    AvailableSlotsQuery, CreateAppointmentCommand, DeleteAppointmentsCommand,
    ListAppointmentsQuery, UpdateAppointmentCommand, UpdateStatusCommand,
};
use crate::domain::foundation::{
    AppointmentId, LocationId, ProfessionalId, ServiceId, Timestamp, UserId,
};

use super::super::{ApiError, AppState, AuthenticatedRequester, TenantContext};
use super::dto::{
    AppointmentResponse, CreateAppointmentRequest, DeleteAppointmentsRequest,
    DeleteAppointmentsResponse, ListAppointmentsResponse, ListQuery, SlotsQuery, SlotsResponse,
    UpdateAppointmentRequest, UpdateStatusRequest,
};

/// POST /appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Clients book for themselves; privileged callers name the client.
    let user_id = match request.user_id {
        Some(id) => UserId::from_uuid(id),
        None => requester
            .user_id
            .ok_or_else(|| ApiError::bad_request("user_id is required"))?,
    };

    let handler = state.create_appointment_handler();
    let appointment = handler
        .handle(CreateAppointmentCommand {
            tenant_id,
            user_id,
            professional_id: request.professional_id.map(ProfessionalId::from_uuid),
            location_id: request.location_id.map(LocationId::from_uuid),
            date: Timestamp::from_datetime(request.date),
            payment_method: request.payment_method,
            service_ids: request
                .service_ids
                .into_iter()
                .map(ServiceId::from_uuid)
                .collect(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse::from(appointment)),
    ))
}

/// GET /appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.list_appointments_handler();
    let result = handler
        .handle(ListAppointmentsQuery {
            tenant_id,
            date: query.date,
            page: query.page,
            limit: query.limit,
            requester,
        })
        .await?;

    Ok(Json(ListAppointmentsResponse::from(result)))
}

/// GET /appointments/available-slots
pub async fn available_slots(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.available_slots_handler();
    let slots = handler
        .handle(AvailableSlotsQuery {
            tenant_id,
            date: query.date,
            service_id: query.service_id.map(ServiceId::from_uuid),
            professional_id: query.professional_id.map(ProfessionalId::from_uuid),
        })
        .await?;

    Ok(Json(SlotsResponse { slots }))
}

/// PATCH /appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.update_appointment_handler();
    let appointment = handler
        .handle(UpdateAppointmentCommand {
            tenant_id,
            appointment_id: AppointmentId::from_uuid(id),
            requester,
            date: request.date.map(Timestamp::from_datetime),
            professional_id: request.professional_id.map(ProfessionalId::from_uuid),
            location_id: request.location_id.map(LocationId::from_uuid),
            service_ids: request
                .service_ids
                .map(|ids| ids.into_iter().map(ServiceId::from_uuid).collect()),
        })
        .await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

/// PATCH /appointments/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.update_status_handler();
    let appointment = handler
        .handle(UpdateStatusCommand {
            tenant_id,
            appointment_id: AppointmentId::from_uuid(id),
            new_status: request.status,
            requester,
        })
        .await?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

/// DELETE /appointments
pub async fn delete_appointments(
    State(state): State<AppState>,
    TenantContext(tenant_id): TenantContext,
    AuthenticatedRequester(requester): AuthenticatedRequester,
    Json(request): Json<DeleteAppointmentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.delete_appointments_handler();
    let deleted = handler
        .handle(DeleteAppointmentsCommand {
            tenant_id,
            appointment_ids: request
                .ids
                .into_iter()
                .map(AppointmentId::from_uuid)
                .collect(),
            requester,
        })
        .await?;

    Ok(Json(DeleteAppointmentsResponse { deleted }))
}
