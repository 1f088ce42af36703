//! Appointment aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::billing::PaymentMethod;
use crate::domain::foundation::{
    AppointmentId, LocationId, ProfessionalId, ServiceId, TenantId, Timestamp, UserId,
};

use super::AppointmentStatus;

/// A booked time slot for a client, optionally assigned to a professional.
///
/// Mutated only through the lifecycle handlers; the status field moves
/// through the `AppointmentStatus` state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub professional_id: Option<ProfessionalId>,
    pub location_id: Option<LocationId>,
    pub date: Timestamp,
    pub status: AppointmentStatus,
    pub payment_method: PaymentMethod,
    pub service_ids: Vec<ServiceId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Appointment {
    /// Creates a new appointment.
    ///
    /// The initial status is derived from the payment method: online
    /// payments stay `Pending` until the gateway webhook confirms them,
    /// everything else is confirmed on the spot.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        user_id: UserId,
        professional_id: Option<ProfessionalId>,
        location_id: Option<LocationId>,
        date: Timestamp,
        payment_method: PaymentMethod,
        service_ids: Vec<ServiceId>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: AppointmentId::new(),
            tenant_id,
            user_id,
            professional_id,
            location_id,
            date,
            status: Self::initial_status(payment_method),
            payment_method,
            service_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// Initial lifecycle status for a given payment method.
    pub fn initial_status(method: PaymentMethod) -> AppointmentStatus {
        if method.is_deferred() {
            AppointmentStatus::Pending
        } else {
            AppointmentStatus::Confirmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(h: u32, m: u32) -> Timestamp {
        Timestamp::from_date_time(
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        )
    }

    #[test]
    fn online_bookings_start_pending() {
        let appt = Appointment::new(
            TenantId::new(),
            UserId::new(),
            None,
            None,
            at(10, 0),
            PaymentMethod::Online,
            vec![],
        );
        assert_eq!(appt.status, AppointmentStatus::Pending);
    }

    #[test]
    fn cash_card_and_credit_bookings_start_confirmed() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::CreditCard,
            PaymentMethod::PlanCredit,
        ] {
            assert_eq!(
                Appointment::initial_status(method),
                AppointmentStatus::Confirmed
            );
        }
    }
}
