use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateAppointmentRequest, ListAppointmentsQuery, UpdateAppointmentRequest},
    parse::{self, parse_or_omit},
    repo_types::{Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, SortOrder},
};
use crate::{
    auth::{
        claims::Session,
        policy::{ensure_allowed, Operation},
    },
    error::{AppError, AppResult},
    notifications::AppointmentEvent,
    state::AppState,
    users::repo_types::Role,
};

fn parse_appointment_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation("Invalid appointment ID".into()))
}

/// Books an appointment for the caller. The patient is always the caller.
pub async fn create(
    state: &AppState,
    session: &Session,
    req: CreateAppointmentRequest,
) -> AppResult<Appointment> {
    ensure_allowed(session, Operation::BookAppointment)?;

    let (Some(start_time), Some(end_time)) =
        (parse::rfc3339(&req.start_time), parse::rfc3339(&req.end_time))
    else {
        return Err(AppError::Validation(
            "Invalid time format, use RFC3339".into(),
        ));
    };

    let patient = state
        .users
        .find_by_id(session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let apt = Appointment {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        patient_name: patient.full_name.clone(),
        start_time,
        end_time,
        service: req.service,
        status: AppointmentStatus::scheduled(),
    };
    state.appointments.insert(&apt).await?;
    info!(appointment_id = %apt.id, user_id = %patient.id, "appointment booked");

    state
        .notifier
        .notify_appointment(AppointmentEvent::Booked, &patient, &apt);
    Ok(apt)
}

/// Builds the store filter for a listing. Clients are pinned to their own id.
pub fn list_filter(session: &Session, query: &ListAppointmentsQuery) -> AppointmentFilter {
    let patient_id = match session.role {
        Role::Client => Some(session.user_id),
        Role::Dentist | Role::Staff => {
            parse_or_omit("patientId", query.patient_id.as_deref(), parse::uuid)
        }
    };
    AppointmentFilter {
        patient_id,
        starts_from: parse_or_omit("startDate", query.start_date.as_deref(), parse::day_start),
        starts_until: parse_or_omit("endDate", query.end_date.as_deref(), parse::day_end),
        status: parse_or_omit("status", query.status.as_deref(), |s| {
            Some(AppointmentStatus(s.to_string()))
        }),
    }
}

/// Lists appointments visible to the caller in the requested order.
pub async fn list(
    state: &AppState,
    session: &Session,
    query: &ListAppointmentsQuery,
    order: SortOrder,
) -> AppResult<Vec<Appointment>> {
    ensure_allowed(session, Operation::ListAppointments)?;
    let filter = list_filter(session, query);
    Ok(state.appointments.find_many(&filter, order).await?)
}

/// Maps an update body onto the fields to write; malformed timestamps are left out.
pub fn changes_from_request(req: UpdateAppointmentRequest) -> AppointmentChanges {
    AppointmentChanges {
        start_time: parse_or_omit("startTime", req.start_time.as_deref(), parse::rfc3339),
        end_time: parse_or_omit("endTime", req.end_time.as_deref(), parse::rfc3339),
        service: req.service,
        status: req.status.map(AppointmentStatus),
    }
}

pub async fn update(
    state: &AppState,
    session: &Session,
    raw_id: &str,
    req: UpdateAppointmentRequest,
) -> AppResult<Appointment> {
    ensure_allowed(session, Operation::ModifyAppointment)?;
    let id = parse_appointment_id(raw_id)?;

    let changes = changes_from_request(req);
    if changes.is_empty() {
        return Err(AppError::Validation("No fields to update".into()));
    }

    let apt = state
        .appointments
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;
    info!(appointment_id = %id, user_id = %session.user_id, "appointment updated");
    Ok(apt)
}

/// Marks an appointment cancelled and tells the patient. The record is kept.
pub async fn cancel(state: &AppState, session: &Session, raw_id: &str) -> AppResult<Appointment> {
    ensure_allowed(session, Operation::CancelAppointment)?;
    let id = parse_appointment_id(raw_id)?;

    if state.appointments.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound("Appointment not found".into()));
    }

    let changes = AppointmentChanges {
        status: Some(AppointmentStatus::cancelled()),
        ..Default::default()
    };
    let apt = state
        .appointments
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;
    info!(appointment_id = %id, user_id = %session.user_id, "appointment cancelled");

    match state.users.find_by_id(apt.patient_id).await {
        Ok(Some(patient)) => {
            state
                .notifier
                .notify_appointment(AppointmentEvent::Cancelled, &patient, &apt);
        }
        Ok(None) => {
            warn!(appointment_id = %id, patient_id = %apt.patient_id, "patient missing; cancellation sms skipped");
        }
        Err(e) => {
            warn!(appointment_id = %id, error = %e, "patient lookup failed; cancellation sms skipped");
        }
    }
    Ok(apt)
}
