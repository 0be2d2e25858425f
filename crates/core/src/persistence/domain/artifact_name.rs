use chrono::{DateTime, Local};

use crate::detection::domain::detection::DetectionResult;

/// `detection_[{context}_]{YYYYMMDD_HHMMSS}.jpg`
///
/// Second granularity: two saves in the same second with the same context
/// resolve to the same name.
pub fn artifact_file_name(result: &DetectionResult, timestamp: &DateTime<Local>) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S");
    match result.context_token() {
        Some(context) => format!("detection_{context}_{stamp}.jpg"),
        None => format!("detection_{stamp}.jpg"),
    }
}
