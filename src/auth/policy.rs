//! Role-based access control.
//!
//! Every protected service calls [`ensure_allowed`] before it touches a store,
//! so a denied caller never causes a query or a mutation.

use tracing::warn;

use super::claims::Session;
use crate::{error::AppError, users::repo_types::Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BookAppointment,
    ListAppointments,
    ModifyAppointment,
    CancelAppointment,
    ViewProfile,
    UpdateProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn authorize(role: Role, op: Operation) -> Decision {
    use Operation::*;

    let allowed = match op {
        BookAppointment => role == Role::Client,
        ModifyAppointment | CancelAppointment => matches!(role, Role::Dentist | Role::Staff),
        ListAppointments | ViewProfile | UpdateProfile => true,
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

fn denial_message(op: Operation) -> &'static str {
    match op {
        Operation::BookAppointment => "Only clients can book appointments",
        _ => "Permission denied",
    }
}

pub fn ensure_allowed(session: &Session, op: Operation) -> Result<(), AppError> {
    match authorize(session.role, op) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            warn!(user_id = %session.user_id, role = %session.role, operation = ?op, "permission denied");
            Err(AppError::PermissionDenied(denial_message(op).into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn only_clients_book() {
        assert_eq!(authorize(Role::Client, Operation::BookAppointment), Decision::Allow);
        assert_eq!(authorize(Role::Dentist, Operation::BookAppointment), Decision::Deny);
        assert_eq!(authorize(Role::Staff, Operation::BookAppointment), Decision::Deny);
    }

    #[test]
    fn only_dentist_and_staff_modify_or_cancel() {
        for op in [Operation::ModifyAppointment, Operation::CancelAppointment] {
            assert_eq!(authorize(Role::Client, op), Decision::Deny);
            assert_eq!(authorize(Role::Dentist, op), Decision::Allow);
            assert_eq!(authorize(Role::Staff, op), Decision::Allow);
        }
    }

    #[test]
    fn every_role_lists_and_manages_own_profile() {
        for role in [Role::Client, Role::Dentist, Role::Staff] {
            for op in [
                Operation::ListAppointments,
                Operation::ViewProfile,
                Operation::UpdateProfile,
            ] {
                assert_eq!(authorize(role, op), Decision::Allow);
            }
        }
    }

    #[test]
    fn deny_becomes_permission_denied() {
        let session = Session {
            user_id: Uuid::new_v4(),
            role: Role::Staff,
        };
        let err = ensure_allowed(&session, Operation::BookAppointment).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }
}
