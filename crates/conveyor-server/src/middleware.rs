//! Request-scoped logging with a generated request id.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use rand::Rng;
use tracing::{Instrument, debug, info, info_span, warn};

/// Requests slower than this are logged at warn.
const MAX_EXPECTED_DURATION_MS: u64 = 2000;

/// Wraps every request in a span carrying a generated request id, and logs
/// receipt, completion status and duration.
pub async fn request_context(request: Request, next: Next) -> Response {
    let request_id = format!("{:08x}", rand::thread_rng().r#gen::<u32>());
    let span = info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        info!("request received");
        let start = Instant::now();

        let response = next.run(request).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(status = %response.status(), duration_ms, "request finished");
        if duration_ms > MAX_EXPECTED_DURATION_MS {
            warn!(
                expected_ms = MAX_EXPECTED_DURATION_MS,
                actual_ms = duration_ms,
                "request took longer than expected"
            );
        }
        response
    }
    .instrument(span)
    .await
}
