//! Shared response envelope for API handlers.
//!
//! Every successful response uses a `{ "data": ... }` envelope. Use
//! [`DataResponse`] rather than ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
