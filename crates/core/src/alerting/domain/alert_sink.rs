use super::alert::Alert;

/// Destination for detection alerts.
pub trait AlertSink: Send {
    fn notify(&self, alert: &Alert) -> Result<(), Box<dyn std::error::Error>>;
}

/// Discards every alert.
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn notify(&self, _alert: &Alert) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

/// Writes alerts to the log at `info`.
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, alert: &Alert) -> Result<(), Box<dyn std::error::Error>> {
        let who = if alert.names.is_empty() {
            "unidentified subject".to_string()
        } else {
            alert.names.join(", ")
        };
        match &alert.image_path {
            Some(path) => log::info!("ALERT: {who} detected, image saved to {}", path.display()),
            None => log::info!("ALERT: {who} detected"),
        }
        Ok(())
    }
}
