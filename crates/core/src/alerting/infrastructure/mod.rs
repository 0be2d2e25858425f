pub mod background_alert_sink;
pub mod webhook_alert_sink;
