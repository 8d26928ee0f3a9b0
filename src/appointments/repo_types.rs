use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Free-form status tag. `Scheduled` and `Cancelled` are the values the
/// service itself writes; staff may set any other label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AppointmentStatus(pub String);

impl AppointmentStatus {
    pub const SCHEDULED: &'static str = "Scheduled";
    pub const CANCELLED: &'static str = "Cancelled";

    pub fn scheduled() -> Self {
        Self(Self::SCHEDULED.into())
    }

    pub fn cancelled() -> Self {
        Self(Self::CANCELLED.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Appointment record.
///
/// `patient_name` is a snapshot of the patient's name at booking time and is
/// not rewritten when the profile changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub service: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first; groups the listing by day.
    StartAscending,
    /// Newest first.
    StartDescending,
}

/// Query over appointments; every `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub starts_from: Option<OffsetDateTime>,
    pub starts_until: Option<OffsetDateTime>,
    pub status: Option<AppointmentStatus>,
}

/// Sparse update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentChanges {
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub service: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.end_time.is_none()
            && self.service.is_none()
            && self.status.is_none()
    }
}
