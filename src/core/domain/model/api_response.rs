use serde::Deserialize;

/// The `{ "data": ... }` envelope wrapping every PVE API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub data: T,
}
