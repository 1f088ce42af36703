//! Authorization policy for appointment lifecycle operations.
//!
//! A single pure table mapping `(role, action)` to a predicate over the
//! requester and the target appointment. Handlers call this at the top of
//! each operation so the transition logic below stays free of role checks.

use crate::domain::foundation::{DomainError, Requester, Role, UserId};

use super::{Appointment, AppointmentStatus};

/// Visibility scope for listing, derived from the requester's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// All appointments of the tenant.
    All,

    /// Only the requester's own appointments.
    OwnUser(UserId),

    /// Only appointments whose professional record carries this email.
    ProfessionalEmail(String),
}

/// Computes what slice of the tenant's appointments a requester may see.
pub fn list_scope(requester: &Requester) -> Result<ListScope, DomainError> {
    match requester.role {
        Role::Admin | Role::Service => Ok(ListScope::All),
        Role::Client => requester
            .user_id
            .map(ListScope::OwnUser)
            .ok_or_else(|| DomainError::forbidden("Client requester without a user id")),
        Role::Staff => requester
            .email
            .clone()
            .map(ListScope::ProfessionalEmail)
            .ok_or_else(|| DomainError::forbidden("Staff requester without an account email")),
    }
}

/// Batch deletion is admin-only; checked once, before any row is touched.
pub fn authorize_delete_batch(requester: &Requester) -> Result<(), DomainError> {
    if requester.is_privileged() {
        Ok(())
    } else {
        Err(DomainError::forbidden("Only admins may delete appointments"))
    }
}

/// An action on a single appointment that requires authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    /// Reschedule or otherwise modify the appointment.
    Edit,

    /// Move the appointment to a new status.
    Transition(AppointmentStatus),

    /// Delete as part of an admin batch.
    Delete,
}

/// Checks whether `requester` may perform `action` on `appointment`.
///
/// `professional_email` is the email of the appointment's assigned
/// professional, when one exists; staff access is granted through it.
pub fn authorize(
    requester: &Requester,
    action: AppointmentAction,
    appointment: &Appointment,
    professional_email: Option<&str>,
) -> Result<(), DomainError> {
    match requester.role {
        Role::Admin | Role::Service => Ok(()),

        Role::Client => match action {
            AppointmentAction::Transition(AppointmentStatus::Canceled) => {
                if requester.user_id == Some(appointment.user_id) {
                    Ok(())
                } else {
                    Err(DomainError::forbidden(
                        "Clients may only cancel their own appointments",
                    ))
                }
            }
            AppointmentAction::Transition(_) => Err(DomainError::forbidden(
                "Clients may only cancel appointments",
            )),
            AppointmentAction::Edit => {
                Err(DomainError::forbidden("Clients may not edit appointments"))
            }
            AppointmentAction::Delete => {
                Err(DomainError::forbidden("Only admins may delete appointments"))
            }
        },

        Role::Staff => match action {
            AppointmentAction::Delete => {
                Err(DomainError::forbidden("Only admins may delete appointments"))
            }
            AppointmentAction::Edit | AppointmentAction::Transition(_) => {
                let matches = match (requester.email.as_deref(), professional_email) {
                    (Some(own), Some(linked)) => own.eq_ignore_ascii_case(linked),
                    _ => false,
                };
                if matches {
                    Ok(())
                } else {
                    Err(DomainError::forbidden(
                        "Staff may only act on their own professional's appointments",
                    ))
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::PaymentMethod;
    use crate::domain::foundation::{ErrorCode, TenantId, Timestamp};

    fn appointment(user_id: UserId) -> Appointment {
        Appointment::new(
            TenantId::new(),
            user_id,
            None,
            None,
            Timestamp::now(),
            PaymentMethod::Cash,
            vec![],
        )
    }

    #[test]
    fn client_may_cancel_their_own_appointment() {
        let user = UserId::new();
        let appt = appointment(user);
        let requester = Requester::client(user);

        let result = authorize(
            &requester,
            AppointmentAction::Transition(AppointmentStatus::Canceled),
            &appt,
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn client_may_not_confirm_or_complete() {
        let user = UserId::new();
        let appt = appointment(user);
        let requester = Requester::client(user);

        for to in [AppointmentStatus::Confirmed, AppointmentStatus::Completed] {
            let err = authorize(
                &requester,
                AppointmentAction::Transition(to),
                &appt,
                None,
            )
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::Forbidden);
        }
    }

    #[test]
    fn client_may_not_cancel_someone_elses_appointment() {
        let appt = appointment(UserId::new());
        let requester = Requester::client(UserId::new());

        let err = authorize(
            &requester,
            AppointmentAction::Transition(AppointmentStatus::Canceled),
            &appt,
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn client_may_never_edit() {
        let user = UserId::new();
        let appt = appointment(user);
        let err = authorize(
            &Requester::client(user),
            AppointmentAction::Edit,
            &appt,
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn staff_access_follows_professional_email() {
        let appt = appointment(UserId::new());
        let requester = Requester::staff(UserId::new(), "pro@clinic.com");

        assert!(authorize(
            &requester,
            AppointmentAction::Edit,
            &appt,
            Some("pro@clinic.com"),
        )
        .is_ok());

        assert!(authorize(
            &requester,
            AppointmentAction::Edit,
            &appt,
            Some("other@clinic.com"),
        )
        .is_err());

        // Unassigned appointment: no email to match.
        assert!(authorize(&requester, AppointmentAction::Edit, &appt, None).is_err());
    }

    #[test]
    fn only_admin_and_service_may_delete() {
        let appt = appointment(UserId::new());

        assert!(authorize(
            &Requester::admin(UserId::new()),
            AppointmentAction::Delete,
            &appt,
            None,
        )
        .is_ok());
        assert!(authorize(&Requester::service(), AppointmentAction::Delete, &appt, None).is_ok());
        assert!(authorize(
            &Requester::staff(UserId::new(), "pro@clinic.com"),
            AppointmentAction::Delete,
            &appt,
            Some("pro@clinic.com"),
        )
        .is_err());
    }

    #[test]
    fn delete_batch_is_admin_only() {
        assert!(authorize_delete_batch(&Requester::admin(UserId::new())).is_ok());
        assert!(authorize_delete_batch(&Requester::service()).is_ok());
        assert!(authorize_delete_batch(&Requester::client(UserId::new())).is_err());
        assert!(authorize_delete_batch(&Requester::staff(UserId::new(), "s@x.com")).is_err());
    }

    #[test]
    fn list_scope_maps_roles() {
        let user = UserId::new();
        assert_eq!(
            list_scope(&Requester::client(user)).unwrap(),
            ListScope::OwnUser(user)
        );
        assert_eq!(
            list_scope(&Requester::staff(user, "pro@clinic.com")).unwrap(),
            ListScope::ProfessionalEmail("pro@clinic.com".to_string())
        );
        assert_eq!(list_scope(&Requester::admin(user)).unwrap(), ListScope::All);
        assert_eq!(list_scope(&Requester::service()).unwrap(), ListScope::All);
    }
}
