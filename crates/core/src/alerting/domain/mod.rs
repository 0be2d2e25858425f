pub mod alert;
pub mod alert_sink;
