use std::time::Duration;

use crate::alerting::domain::alert::Alert;
use crate::alerting::domain::alert_sink::AlertSink;
use crate::shared::constants::WEBHOOK_TIMEOUT;

/// POSTs each alert as JSON to a webhook URL.
pub struct WebhookAlertSink {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookAlertSink {
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, WEBHOOK_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl AlertSink for WebhookAlertSink {
    fn notify(&self, alert: &Alert) -> Result<(), Box<dyn std::error::Error>> {
        self.client
            .post(&self.url)
            .json(alert)
            .send()?
            .error_for_status()?;
        log::debug!("Alert delivered to {}", self.url);
        Ok(())
    }
}
