use serde::Deserialize;

/// POST /api/appointments; times are RFC 3339.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub service: String,
}

/// PUT /api/appointments/:id; any subset of fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub service: Option<String>,
    pub status: Option<String>,
}

/// Query string shared by both listing routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAppointmentsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub patient_id: Option<String>,
}
