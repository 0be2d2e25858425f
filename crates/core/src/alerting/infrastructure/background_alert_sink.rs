use std::thread::JoinHandle;

use crate::alerting::domain::alert::Alert;
use crate::alerting::domain::alert_sink::AlertSink;

/// Delivers alerts on a dedicated worker thread.
///
/// `notify` only enqueues, so a slow or failing sink never holds up a
/// monitoring cycle. Delivery failures are logged by the worker. Dropping
/// the sink closes the queue and waits for pending alerts to drain.
pub struct BackgroundAlertSink {
    sender: Option<crossbeam_channel::Sender<Alert>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundAlertSink {
    pub fn new(inner: Box<dyn AlertSink>) -> Result<Self, std::io::Error> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Alert>();
        let worker = std::thread::Builder::new()
            .name("alert-worker".into())
            .spawn(move || {
                for alert in receiver {
                    if let Err(e) = inner.notify(&alert) {
                        log::error!("Alert delivery failed: {e}");
                    }
                }
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl AlertSink for BackgroundAlertSink {
    fn notify(&self, alert: &Alert) -> Result<(), Box<dyn std::error::Error>> {
        let sender = self.sender.as_ref().ok_or("alert worker has shut down")?;
        sender
            .send(alert.clone())
            .map_err(|_| "alert worker has stopped")?;
        Ok(())
    }
}

impl Drop for BackgroundAlertSink {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Alert worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingSink {
        seen: Arc<Mutex<Vec<Vec<String>>>>,
        fail_first: bool,
        delay: Duration,
    }

    impl AlertSink for RecordingSink {
        fn notify(&self, alert: &Alert) -> Result<(), Box<dyn std::error::Error>> {
            std::thread::sleep(self.delay);
            let mut seen = self.seen.lock().unwrap();
            seen.push(alert.names.clone());
            if self.fail_first && seen.len() == 1 {
                return Err("webhook returned 500".into());
            }
            Ok(())
        }
    }

    fn alert(name: &str) -> Alert {
        Alert {
            image_path: None,
            names: vec![name.to_string()],
            timestamp: chrono::Local::now(),
        }
    }

    fn recording(fail_first: bool, delay: Duration) -> (RecordingSink, Arc<Mutex<Vec<Vec<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingSink {
                seen: seen.clone(),
                fail_first,
                delay,
            },
            seen,
        )
    }

    #[test]
    fn test_delivers_in_order_before_drop_returns() {
        let (inner, seen) = recording(false, Duration::ZERO);
        let sink = BackgroundAlertSink::new(Box::new(inner)).unwrap();
        sink.notify(&alert("alice")).unwrap();
        sink.notify(&alert("bob")).unwrap();
        drop(sink);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec!["alice".to_string()], vec!["bob".to_string()]]
        );
    }

    #[test]
    fn test_inner_failure_does_not_propagate() {
        let (inner, seen) = recording(true, Duration::ZERO);
        let sink = BackgroundAlertSink::new(Box::new(inner)).unwrap();
        assert!(sink.notify(&alert("alice")).is_ok());
        assert!(sink.notify(&alert("bob")).is_ok());
        drop(sink);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_notify_does_not_wait_for_slow_sink() {
        let (inner, _seen) = recording(false, Duration::from_millis(300));
        let sink = BackgroundAlertSink::new(Box::new(inner)).unwrap();

        let started = std::time::Instant::now();
        sink.notify(&alert("alice")).unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));
    }
}
