//! UpdateAppointmentHandler - reschedule and reassign.
//!
//! Clients never update appointments; staff only touch their own
//! professional's. A change of date or professional re-validates the slot
//! against other non-canceled appointments, excluding the one being edited.

use std::sync::Arc;

use crate::domain::foundation::{
    AppointmentId, DomainError, ErrorCode, LocationId, ProfessionalId, Requester, ServiceId,
    TenantId, Timestamp,
};
use crate::domain::scheduling::{authorize, Appointment, AppointmentAction};
use crate::ports::{AppointmentRepository, CatalogReader};

/// Command to update an appointment. `None` fields are left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateAppointmentCommand {
    pub tenant_id: TenantId,
    pub appointment_id: AppointmentId,
    pub requester: Requester,
    pub date: Option<Timestamp>,
    pub professional_id: Option<ProfessionalId>,
    pub location_id: Option<LocationId>,
    pub service_ids: Option<Vec<ServiceId>>,
}

/// Handler for appointment updates.
pub struct UpdateAppointmentHandler {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn CatalogReader>,
}

impl UpdateAppointmentHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, catalog: Arc<dyn CatalogReader>) -> Self {
        Self {
            appointments,
            catalog,
        }
    }

    pub async fn handle(&self, cmd: UpdateAppointmentCommand) -> Result<Appointment, DomainError> {
        // 1. Load the target.
        let mut appointment = self
            .appointments
            .find_by_id(cmd.tenant_id, cmd.appointment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AppointmentNotFound, "Appointment not found")
            })?;

        // 2. Authorization against the assigned professional's email.
        let professional_email = match appointment.professional_id {
            Some(id) => self
                .catalog
                .professional(cmd.tenant_id, id)
                .await?
                .and_then(|p| p.email),
            None => None,
        };
        authorize(
            &cmd.requester,
            AppointmentAction::Edit,
            &appointment,
            professional_email.as_deref(),
        )?;

        // 3. Conflicting edits re-validate availability, excluding self.
        let new_date = cmd.date.unwrap_or(appointment.date);
        let new_professional = cmd.professional_id.or(appointment.professional_id);
        let slot_changed =
            new_date != appointment.date || new_professional != appointment.professional_id;
        if slot_changed {
            if let Some(professional_id) = new_professional {
                let taken = self
                    .appointments
                    .exists_active_at(
                        cmd.tenant_id,
                        professional_id,
                        new_date,
                        Some(appointment.id),
                    )
                    .await?;
                if taken {
                    return Err(DomainError::conflict(
                        "Professional already booked at this time",
                    )
                    .with_detail("professional_id", professional_id.to_string())
                    .with_detail("date", new_date.to_string()));
                }
            }
        }

        // 4. Apply and persist.
        appointment.date = new_date;
        appointment.professional_id = new_professional;
        if let Some(location_id) = cmd.location_id {
            appointment.location_id = Some(location_id);
        }
        if let Some(service_ids) = cmd.service_ids {
            appointment.service_ids = service_ids;
        }
        appointment.updated_at = Timestamp::now();
        self.appointments.update(&appointment).await?;

        tracing::info!(
            tenant_id = %cmd.tenant_id,
            appointment_id = %appointment.id,
            "Appointment updated"
        );
        Ok(appointment)
    }
}
