use serde::{Deserialize, Serialize};

/// Request body for registration. Fields are optional at the serde layer so
/// absence surfaces as a validation error instead of a deserialization one.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Acknowledgment body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}
