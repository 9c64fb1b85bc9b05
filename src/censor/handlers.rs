use std::sync::Arc;

use axum::{extract::State, Json};

use crate::censor::filter::{Denylist, Verdict};
use crate::censor::types::{CheckRequest, CheckResponse, PASSED_MESSAGE};
use crate::http::{JsonBody, RequestId, ServiceError};
use crate::observability::metrics;

/// `POST /check`
pub async fn check_text(
    State(denylist): State<Arc<Denylist>>,
    request_id: RequestId,
    JsonBody(request): JsonBody<CheckRequest>,
) -> Result<Json<CheckResponse>, ServiceError> {
    match denylist.check(&request.text) {
        Verdict::Accepted => {
            tracing::debug!(request_id = %request_id, "Text passed censorship check");
            Ok(Json(CheckResponse {
                message: PASSED_MESSAGE.to_string(),
            }))
        }
        Verdict::Rejected { term } => {
            tracing::info!(request_id = %request_id, term = %term, "Text rejected by denylist");
            metrics::record_censor_rejection();
            Err(ServiceError::BadRequest(
                "Text contains prohibited content".into(),
            ))
        }
    }
}
