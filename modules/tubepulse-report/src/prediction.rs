use std::time::Duration;

use tracing::{info, warn};
use tubepulse_common::{Comment, Prediction};

use crate::guard::{guarded, CallOutcome, CancelFlag};
use crate::traits::SentimentBackend;

/// Submit every comment for prediction.
///
/// `None` is the failure marker: non-success status, transport error, timeout,
/// an unparseable body, or cancellation. Order is trusted to match the input.
pub async fn predict(
    backend: &dyn SentimentBackend,
    comments: &[Comment],
    timeout: Duration,
    cancel: &CancelFlag,
) -> Option<Vec<Prediction>> {
    let outcome = guarded(
        "predict_with_timestamps",
        timeout,
        cancel,
        backend.predict_with_timestamps(comments),
    )
    .await;

    match outcome {
        CallOutcome::Success(predictions) => {
            if predictions.len() != comments.len() {
                warn!(
                    submitted = comments.len(),
                    returned = predictions.len(),
                    "Prediction count differs from comment count"
                );
            }
            info!(count = predictions.len(), "Sentiment predictions ready");
            Some(predictions)
        }
        _ => None,
    }
}
