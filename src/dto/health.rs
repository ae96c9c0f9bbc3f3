use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" when a storage backend is installed and answering, "degraded" otherwise.
    pub status: &'static str,
    /// Storage backend in use, when one is installed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<&'static str>,
}

impl HealthResponse {
    pub fn ok(storage: &'static str) -> Self {
        Self {
            status: "ok",
            storage: Some(storage),
        }
    }

    pub fn degraded() -> Self {
        Self {
            status: "degraded",
            storage: None,
        }
    }
}
