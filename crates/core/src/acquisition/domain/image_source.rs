use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

/// Where a frame came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOrigin {
    Live,
    /// Substituted from the local fallback directory. Holds the file that was
    /// chosen, the same path logged when the substitution happens.
    Fallback(PathBuf),
}

#[derive(Clone, Debug)]
pub struct AcquiredFrame {
    pub frame: Frame,
    pub origin: FrameOrigin,
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Both the camera and the fallback directory failed. The cycle is skipped.
    #[error("no image available: {0}")]
    NoImageAvailable(String),
}

/// Produces the frame for one monitoring cycle.
pub trait ImageSource: Send {
    fn acquire(&mut self) -> Result<AcquiredFrame, AcquisitionError>;
}
