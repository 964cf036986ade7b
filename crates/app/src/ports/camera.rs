//! Camera port — capture sessions that report recognized barcodes.
//!
//! A camera adapter pushes one [`CodeReport`] per processed frame onto the
//! channel it is handed when the session starts. The frames are consumed by
//! the [`ScanController`](crate::scanner::ScanController), which owns the
//! session exclusively.

use std::fmt;

use tokio::sync::mpsc;

/// Codes recognized in a single camera frame, in the camera's report order.
pub type CodeReport = Vec<String>;

/// Barcode families the scanner asks the camera to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    Ean13,
    Ean8,
    Code128,
}

impl Symbology {
    /// Every symbology used for grocery scanning.
    pub const ALL: [Self; 3] = [Self::Ean13, Self::Ean8, Self::Code128];
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::Code128 => "CODE-128",
        })
    }
}

/// Why a capture session could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// No capture device is present.
    #[error("no capture device available")]
    Unavailable,

    /// The device exists but its input or output could not be wired up.
    #[error("capture session setup failed")]
    Setup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A device that can run one capture session at a time.
pub trait Camera {
    /// Open a capture session recognizing `symbologies`.
    ///
    /// Frames must be sent on `frames` until [`stop_capture`](Self::stop_capture)
    /// is called. Sending may fail once the receiving side has been dropped;
    /// adapters should stop quietly in that case.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError`] when no session could be opened. No resource
    /// is held after an error.
    fn start_capture(
        &mut self,
        symbologies: &[Symbology],
        frames: mpsc::UnboundedSender<CodeReport>,
    ) -> Result<(), CameraError>;

    /// Close the running session. Must be idempotent.
    fn stop_capture(&mut self);
}
