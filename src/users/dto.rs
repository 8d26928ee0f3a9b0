use serde::Deserialize;

/// PUT /api/user/:id. Only the full name is editable.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
}
