use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

/// A positive detection worth telling someone about.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    /// Saved annotated frame, absent when saving is disabled or failed.
    pub image_path: Option<PathBuf>,
    /// Distinct recognized names; empty for unknown faces and persons.
    pub names: Vec<String>,
    pub timestamp: DateTime<Local>,
}
