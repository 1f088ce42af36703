//! In-memory repositories for tests and local development.
//!
//! Behavioral mirrors of the postgres adapters, including the slot
//! uniqueness constraint and the conditional credit decrement.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::billing::{Payment, PaymentStatus, Subscription, SubscriptionStatus};
use crate::domain::foundation::{
    AppointmentId, DomainError, ProfessionalId, ServiceId, SubscriptionId, TenantId, Timestamp,
    UserId,
};
use crate::domain::scheduling::{Appointment, AppointmentStatus, ListScope};
use crate::ports::{
    AppointmentQuery, AppointmentRepository, BookedSlot, Page, PaymentRepository,
    SubscriptionRepository,
};

/// In-memory appointment store.
///
/// Service durations and professional emails are registered through the
/// helper setters so scope filtering and `booked_slots` behave like the
/// SQL joins they stand in for.
#[derive(Default)]
pub struct InMemoryAppointments {
    appointments: Mutex<HashMap<AppointmentId, Appointment>>,
    service_durations: Mutex<HashMap<ServiceId, u32>>,
    professional_emails: Mutex<HashMap<ProfessionalId, String>>,
}

impl InMemoryAppointments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service duration used by `booked_slots`.
    pub fn set_service_duration(&self, id: ServiceId, minutes: u32) {
        self.service_durations.lock().unwrap().insert(id, minutes);
    }

    /// Registers a professional's email used by staff scope filtering.
    pub fn link_professional_email(&self, id: ProfessionalId, email: impl Into<String>) {
        self.professional_emails
            .lock()
            .unwrap()
            .insert(id, email.into());
    }

    pub fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.appointments.lock().unwrap().get(&id).cloned()
    }

    fn slot_taken(
        &self,
        guard: &HashMap<AppointmentId, Appointment>,
        tenant_id: TenantId,
        professional_id: ProfessionalId,
        date: Timestamp,
        exclude: Option<AppointmentId>,
    ) -> bool {
        guard.values().any(|a| {
            a.tenant_id == tenant_id
                && a.professional_id == Some(professional_id)
                && a.date == date
                && a.status.blocks_slot()
                && Some(a.id) != exclude
        })
    }

    fn matches_query(
        &self,
        appointment: &Appointment,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> bool {
        if appointment.tenant_id != tenant_id {
            return false;
        }
        if let Some((start, end)) = &query.window {
            if appointment.date.is_before(start) || appointment.date.is_after(end) {
                return false;
            }
        }
        match &query.scope {
            ListScope::All => true,
            ListScope::OwnUser(user_id) => appointment.user_id == *user_id,
            ListScope::ProfessionalEmail(email) => {
                let emails = self.professional_emails.lock().unwrap();
                appointment
                    .professional_id
                    .and_then(|id| emails.get(&id))
                    .map(|linked| linked.eq_ignore_ascii_case(email))
                    .unwrap_or(false)
            }
        }
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointments {
    async fn insert(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut guard = self.appointments.lock().unwrap();
        if let Some(professional_id) = appointment.professional_id {
            if appointment.status.blocks_slot()
                && self.slot_taken(
                    &guard,
                    appointment.tenant_id,
                    professional_id,
                    appointment.date,
                    None,
                )
            {
                return Err(DomainError::conflict(
                    "Professional already booked at this time",
                ));
            }
        }
        guard.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), DomainError> {
        let mut guard = self.appointments.lock().unwrap();
        if let Some(professional_id) = appointment.professional_id {
            if appointment.status.blocks_slot()
                && self.slot_taken(
                    &guard,
                    appointment.tenant_id,
                    professional_id,
                    appointment.date,
                    Some(appointment.id),
                )
            {
                return Err(DomainError::conflict(
                    "Professional already booked at this time",
                ));
            }
        }
        guard.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), DomainError> {
        let mut guard = self.appointments.lock().unwrap();
        match guard.get_mut(&id) {
            Some(a) if a.tenant_id == tenant_id => {
                a.status = status;
                a.updated_at = Timestamp::now();
                Ok(())
            }
            _ => Err(DomainError::new(
                crate::domain::foundation::ErrorCode::AppointmentNotFound,
                "Appointment not found",
            )),
        }
    }

    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, DomainError> {
        let guard = self.appointments.lock().unwrap();
        Ok(guard
            .get(&id)
            .filter(|a| a.tenant_id == tenant_id)
            .cloned())
    }

    async fn exists_active_at(
        &self,
        tenant_id: TenantId,
        professional_id: ProfessionalId,
        date: Timestamp,
        exclude: Option<AppointmentId>,
    ) -> Result<bool, DomainError> {
        let guard = self.appointments.lock().unwrap();
        Ok(self.slot_taken(&guard, tenant_id, professional_id, date, exclude))
    }

    async fn booked_slots(
        &self,
        tenant_id: TenantId,
        window: (Timestamp, Timestamp),
        professional_id: Option<ProfessionalId>,
    ) -> Result<Vec<BookedSlot>, DomainError> {
        let guard = self.appointments.lock().unwrap();
        let durations = self.service_durations.lock().unwrap();
        let mut slots: Vec<BookedSlot> = guard
            .values()
            .filter(|a| {
                a.tenant_id == tenant_id
                    && a.status.blocks_slot()
                    && !a.date.is_before(&window.0)
                    && !a.date.is_after(&window.1)
                    && professional_id.map_or(true, |p| a.professional_id == Some(p))
            })
            .map(|a| {
                let total: u32 = a
                    .service_ids
                    .iter()
                    .filter_map(|s| durations.get(s))
                    .sum();
                BookedSlot {
                    appointment_id: a.id,
                    start: a.date,
                    duration_minutes: if total == 0 { None } else { Some(total) },
                }
            })
            .collect();
        slots.sort_by_key(|s| s.start);
        Ok(slots)
    }

    async fn list_asc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, DomainError> {
        let guard = self.appointments.lock().unwrap();
        let mut rows: Vec<Appointment> = guard
            .values()
            .filter(|a| self.matches_query(a, tenant_id, query))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        Ok(rows)
    }

    async fn list_page_desc(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
        page: Page,
    ) -> Result<Vec<Appointment>, DomainError> {
        let mut rows = self.list_asc(tenant_id, query).await?;
        rows.reverse();
        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(
        &self,
        tenant_id: TenantId,
        query: &AppointmentQuery,
    ) -> Result<u64, DomainError> {
        let guard = self.appointments.lock().unwrap();
        Ok(guard
            .values()
            .filter(|a| self.matches_query(a, tenant_id, query))
            .count() as u64)
    }

    async fn statuses(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<Vec<(AppointmentId, AppointmentStatus)>, DomainError> {
        let guard = self.appointments.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| {
                guard
                    .get(id)
                    .filter(|a| a.tenant_id == tenant_id)
                    .map(|a| (a.id, a.status))
            })
            .collect())
    }

    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[AppointmentId],
    ) -> Result<u64, DomainError> {
        let mut guard = self.appointments.lock().unwrap();
        let mut removed = 0;
        for id in ids {
            if guard
                .get(id)
                .map(|a| a.tenant_id == tenant_id)
                .unwrap_or(false)
            {
                guard.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// In-memory payment store.
#[derive(Default)]
pub struct InMemoryPayments {
    payments: Mutex<Vec<Payment>>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Payment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPayments {
    async fn insert(&self, payment: &Payment) -> Result<(), DomainError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }

    async fn has_completed_for_appointment(
        &self,
        tenant_id: TenantId,
        appointment_id: AppointmentId,
    ) -> Result<bool, DomainError> {
        Ok(self.payments.lock().unwrap().iter().any(|p| {
            p.tenant_id == tenant_id
                && p.appointment_id == Some(appointment_id)
                && p.status == PaymentStatus::Completed
        }))
    }

    async fn delete_for_appointments(
        &self,
        tenant_id: TenantId,
        appointment_ids: &[AppointmentId],
    ) -> Result<u64, DomainError> {
        let mut guard = self.payments.lock().unwrap();
        let before = guard.len();
        guard.retain(|p| {
            !(p.tenant_id == tenant_id
                && p.appointment_id
                    .map(|id| appointment_ids.contains(&id))
                    .unwrap_or(false))
        });
        Ok((before - guard.len()) as u64)
    }
}

/// In-memory subscription store.
#[derive(Default)]
pub struct InMemorySubscriptions {
    subscriptions: Mutex<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(subscription.id, subscription);
    }

    pub fn get(&self, id: SubscriptionId) -> Option<Subscription> {
        self.subscriptions.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptions {
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .get(&id)
            .filter(|s| s.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_active_with_credits(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .find(|s| {
                s.tenant_id == tenant_id && s.user_id == user_id && s.can_consume_credit()
            })
            .cloned())
    }

    async fn consume_credit(
        &self,
        tenant_id: TenantId,
        id: SubscriptionId,
    ) -> Result<bool, DomainError> {
        let mut guard = self.subscriptions.lock().unwrap();
        match guard.get_mut(&id) {
            Some(s) if s.tenant_id == tenant_id && s.can_consume_credit() => {
                s.credits_remaining -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn activate(&self, tenant_id: TenantId, id: SubscriptionId) -> Result<(), DomainError> {
        let mut guard = self.subscriptions.lock().unwrap();
        let owner = match guard.get(&id) {
            Some(s) if s.tenant_id == tenant_id => s.user_id,
            _ => {
                return Err(DomainError::new(
                    crate::domain::foundation::ErrorCode::SubscriptionNotFound,
                    "Subscription not found",
                ))
            }
        };
        for s in guard.values_mut() {
            if s.tenant_id == tenant_id && s.user_id == owner {
                if s.id == id {
                    s.status = SubscriptionStatus::Active;
                    if s.start_date.is_none() {
                        s.start_date = Some(Timestamp::now());
                    }
                } else if s.status == SubscriptionStatus::Active {
                    s.status = SubscriptionStatus::Canceled;
                }
            }
        }
        Ok(())
    }
}
