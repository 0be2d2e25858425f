use crate::acquisition::domain::image_source::{FrameOrigin, ImageSource};
use crate::alerting::domain::alert::Alert;
use crate::alerting::domain::alert_sink::AlertSink;
use crate::detection::domain::detector::Detector;
use crate::persistence::domain::artifact_persister::{ArtifactPersister, PersistedArtifact};
use crate::shared::clock::Clock;

use super::monitor_loop::MonitorCycle;

/// Outcome of one monitoring cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleReport {
    /// No frame could be acquired.
    Skipped(String),
    /// Frame processed; nothing found or detection failed.
    NothingDetected,
    Detected {
        labels: Vec<String>,
        names: Vec<String>,
        /// Absent when saving is disabled or the save failed.
        artifact: Option<PersistedArtifact>,
    },
}

/// One monitoring cycle: acquire → detect → persist → alert.
pub struct CheckCameraUseCase {
    source: Box<dyn ImageSource>,
    detector: Box<dyn Detector>,
    persister: Option<ArtifactPersister>,
    alert_sink: Box<dyn AlertSink>,
    clock: Box<dyn Clock>,
}

impl CheckCameraUseCase {
    /// `persister` is `None` when annotated frames should not be saved.
    pub fn new(
        source: Box<dyn ImageSource>,
        detector: Box<dyn Detector>,
        persister: Option<ArtifactPersister>,
        alert_sink: Box<dyn AlertSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            source,
            detector,
            persister,
            alert_sink,
            clock,
        }
    }

    pub fn execute(&mut self) -> CycleReport {
        log::info!("Checking camera...");
        let acquired = match self.source.acquire() {
            Ok(acquired) => acquired,
            Err(e) => {
                log::warn!("Skipping cycle: {e}");
                return CycleReport::Skipped(e.to_string());
            }
        };
        if let FrameOrigin::Fallback(path) = &acquired.origin {
            log::debug!("Processing fallback frame {}", path.display());
        }

        let result = self.detector.run(&acquired.frame);
        if result.is_empty() {
            log::info!("Nothing detected");
            return CycleReport::NothingDetected;
        }

        let labels = result.labels();
        let names = result.identified_names();
        log::info!("Detected: {}", labels.join(", "));

        let artifact = match &self.persister {
            Some(persister) => match persister.render_and_save(acquired.frame, &result) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    log::error!("Failed to save detection image: {e}");
                    None
                }
            },
            None => None,
        };

        let alert = Alert {
            image_path: artifact.as_ref().map(|a| a.path.clone()),
            names: names.clone(),
            timestamp: artifact
                .as_ref()
                .map(|a| a.timestamp)
                .unwrap_or_else(|| self.clock.now()),
        };
        if let Err(e) = self.alert_sink.notify(&alert) {
            log::error!("Failed to send alert: {e}");
        }

        CycleReport::Detected {
            labels,
            names,
            artifact,
        }
    }
}

impl MonitorCycle for CheckCameraUseCase {
    fn run_cycle(&mut self) -> Result<CycleReport, Box<dyn std::error::Error>> {
        Ok(self.execute())
    }
}
