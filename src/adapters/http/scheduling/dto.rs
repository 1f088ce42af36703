//! Request/response DTOs for the appointment endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::scheduling::{ListAppointmentsResult, PageMeta};
use crate::domain::billing::PaymentMethod;
use crate::domain::scheduling::{Appointment, AppointmentStatus};

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Booking owner; defaults to the authenticated client.
    pub user_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<DateTime<Utc>>,
    pub professional_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub service_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAppointmentsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAppointmentsResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    pub service_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    pub service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            id: *a.id.as_uuid(),
            user_id: *a.user_id.as_uuid(),
            professional_id: a.professional_id.map(|id| *id.as_uuid()),
            location_id: a.location_id.map(|id| *id.as_uuid()),
            date: *a.date.as_datetime(),
            status: a.status,
            payment_method: a.payment_method,
            service_ids: a.service_ids.iter().map(|id| *id.as_uuid()).collect(),
            created_at: *a.created_at.as_datetime(),
            updated_at: *a.updated_at.as_datetime(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageMetaResponse {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl From<PageMeta> for PageMetaResponse {
    fn from(meta: PageMeta) -> Self {
        Self {
            total: meta.total,
            page: meta.page,
            limit: meta.limit,
            total_pages: meta.total_pages,
        }
    }
}

/// Listing response: a plain array for unpaginated calls, a
/// `{data, meta}` envelope for paginated ones.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListAppointmentsResponse {
    Full(Vec<AppointmentResponse>),
    Paginated {
        data: Vec<AppointmentResponse>,
        meta: PageMetaResponse,
    },
}

impl From<ListAppointmentsResult> for ListAppointmentsResponse {
    fn from(result: ListAppointmentsResult) -> Self {
        match result {
            ListAppointmentsResult::Full(data) => ListAppointmentsResponse::Full(
                data.into_iter().map(AppointmentResponse::from).collect(),
            ),
            ListAppointmentsResult::Paginated { data, meta } => {
                ListAppointmentsResponse::Paginated {
                    data: data.into_iter().map(AppointmentResponse::from).collect(),
                    meta: meta.into(),
                }
            }
        }
    }
}
