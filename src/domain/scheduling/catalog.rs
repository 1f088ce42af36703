//! Catalog entities: services, professionals, and client accounts.
//!
//! These are read-only inside the booking engine; their CRUD lives in the
//! surrounding application.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProfessionalId, ServiceId, TenantId, UserId};

/// A bookable service with a fixed duration and price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub tenant_id: TenantId,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: i64,
}

/// A professional who can be assigned to appointments.
///
/// Staff accounts are linked to a professional record through the email
/// address; an appointment without a professional is an unassigned booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: ProfessionalId,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: Option<String>,
}

/// A client account, as needed for notifications and ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: Option<String>,
    pub chat_subscriber_id: Option<String>,
}

/// Total duration of a set of services, in minutes.
///
/// `default_minutes` applies when the set is empty; the 60-minute default
/// is a business assumption carried in configuration, not a constant.
pub fn total_duration_minutes(services: &[Service], default_minutes: u32) -> u32 {
    let sum: u32 = services.iter().map(|s| s.duration_minutes).sum();
    if sum == 0 {
        default_minutes
    } else {
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(minutes: u32) -> Service {
        Service {
            id: ServiceId::new(),
            tenant_id: TenantId::new(),
            name: "svc".to_string(),
            duration_minutes: minutes,
            price_cents: 0,
        }
    }

    #[test]
    fn durations_sum_across_services() {
        assert_eq!(total_duration_minutes(&[service(30), service(45)], 60), 75);
    }

    #[test]
    fn empty_service_set_falls_back_to_default() {
        assert_eq!(total_duration_minutes(&[], 60), 60);
        assert_eq!(total_duration_minutes(&[], 45), 45);
    }
}
