//! GetAvailableSlotsHandler - thin orchestration over the availability
//! engine.
//!
//! Loads the day's non-canceled appointments (sharing the appointment
//! lookup query) and hands the pure computation to the domain.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{
    DomainError, ErrorCode, ProfessionalId, ServiceId, TenantId, Timestamp,
};
use crate::domain::scheduling::{available_slots, BookedInterval, ScheduleGrid};
use crate::ports::{AppointmentRepository, CatalogReader};

/// Query for a day's open slots.
#[derive(Debug, Clone)]
pub struct AvailableSlotsQuery {
    pub tenant_id: TenantId,
    pub date: NaiveDate,
    pub service_id: Option<ServiceId>,
    pub professional_id: Option<ProfessionalId>,
}

/// Handler computing open slots for a tenant/professional/service/day.
pub struct GetAvailableSlotsHandler {
    appointments: Arc<dyn AppointmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    grid: ScheduleGrid,
}

impl GetAvailableSlotsHandler {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        catalog: Arc<dyn CatalogReader>,
        grid: ScheduleGrid,
    ) -> Self {
        Self {
            appointments,
            catalog,
            grid,
        }
    }

    pub async fn handle(&self, query: AvailableSlotsQuery) -> Result<Vec<String>, DomainError> {
        // 1. Candidate duration: the named service's, or the default.
        let duration_minutes = match query.service_id {
            Some(service_id) => self
                .catalog
                .service(query.tenant_id, service_id)
                .await?
                .ok_or_else(|| DomainError::new(ErrorCode::ServiceNotFound, "Service not found"))?
                .duration_minutes,
            None => self.grid.default_duration_minutes,
        };

        // 2. The day's occupied intervals, professional-filtered when asked.
        let window = Timestamp::day_bounds(query.date);
        let booked = self
            .appointments
            .booked_slots(query.tenant_id, window, query.professional_id)
            .await?;
        let intervals: Vec<BookedInterval> = booked
            .iter()
            .map(|slot| {
                BookedInterval::new(
                    slot.start.minutes_of_day(),
                    slot.duration_minutes
                        .unwrap_or(self.grid.default_duration_minutes),
                )
            })
            .collect();

        // 3. Pure computation.
        Ok(available_slots(&self.grid, duration_minutes, &intervals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAppointments, InMemoryCatalog};
    use crate::domain::billing::PaymentMethod;
    use crate::domain::foundation::UserId;
    use crate::domain::scheduling::{Appointment, Service};
    use crate::ports::AppointmentRepository as _;
    use chrono::NaiveTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn at(h: u32, m: u32) -> Timestamp {
        Timestamp::from_date_time(day(), NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn service(tenant_id: TenantId, minutes: u32) -> Service {
        Service {
            id: ServiceId::new(),
            tenant_id,
            name: "Cut".to_string(),
            duration_minutes: minutes,
            price_cents: 2500,
        }
    }

    #[tokio::test]
    async fn pinned_boundary_scenario() {
        // Tenant T, professional P, service S (30 min). Existing 30-minute
        // appointment at 10:00 for P: 09:30 and 10:30 stay available, 10:00
        // does not.
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let tenant_id = TenantId::new();
        let professional_id = ProfessionalId::new();

        let s = service(tenant_id, 30);
        catalog.add_service(s.clone());
        appointments.set_service_duration(s.id, 30);

        let existing = Appointment::new(
            tenant_id,
            UserId::new(),
            Some(professional_id),
            None,
            at(10, 0),
            PaymentMethod::Cash,
            vec![s.id],
        );
        appointments.insert(&existing).await.unwrap();

        let handler =
            GetAvailableSlotsHandler::new(appointments, catalog, ScheduleGrid::default());
        let slots = handler
            .handle(AvailableSlotsQuery {
                tenant_id,
                date: day(),
                service_id: Some(s.id),
                professional_id: Some(professional_id),
            })
            .await
            .unwrap();

        assert!(slots.contains(&"09:30".to_string()));
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(slots.contains(&"10:30".to_string()));
    }

    #[tokio::test]
    async fn canceled_appointments_free_their_slot() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let tenant_id = TenantId::new();
        let professional_id = ProfessionalId::new();

        let mut existing = Appointment::new(
            tenant_id,
            UserId::new(),
            Some(professional_id),
            None,
            at(10, 0),
            PaymentMethod::Cash,
            vec![],
        );
        existing.status = crate::domain::scheduling::AppointmentStatus::Canceled;
        appointments.insert(&existing).await.unwrap();

        let handler =
            GetAvailableSlotsHandler::new(appointments, catalog, ScheduleGrid::default());
        let slots = handler
            .handle(AvailableSlotsQuery {
                tenant_id,
                date: day(),
                service_id: None,
                professional_id: Some(professional_id),
            })
            .await
            .unwrap();

        assert!(slots.contains(&"10:00".to_string()));
    }

    #[tokio::test]
    async fn without_professional_all_bookings_block() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let tenant_id = TenantId::new();

        // Booked by some professional; query without one still sees it.
        let existing = Appointment::new(
            tenant_id,
            UserId::new(),
            Some(ProfessionalId::new()),
            None,
            at(9, 0),
            PaymentMethod::Cash,
            vec![],
        );
        appointments.insert(&existing).await.unwrap();

        let handler =
            GetAvailableSlotsHandler::new(appointments, catalog, ScheduleGrid::default());
        let slots = handler
            .handle(AvailableSlotsQuery {
                tenant_id,
                date: day(),
                service_id: None,
                professional_id: None,
            })
            .await
            .unwrap();

        // Default 60-minute booking at 09:00 blocks 09:00 and 09:30.
        assert!(!slots.contains(&"09:00".to_string()));
        assert!(!slots.contains(&"09:30".to_string()));
        assert!(slots.contains(&"10:00".to_string()));
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let appointments = Arc::new(InMemoryAppointments::new());
        let catalog = Arc::new(InMemoryCatalog::new());

        let handler =
            GetAvailableSlotsHandler::new(appointments, catalog, ScheduleGrid::default());
        let err = handler
            .handle(AvailableSlotsQuery {
                tenant_id: TenantId::new(),
                date: day(),
                service_id: Some(ServiceId::new()),
                professional_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ServiceNotFound);
    }
}
