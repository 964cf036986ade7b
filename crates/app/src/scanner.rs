//! Scan capture — turns a continuous camera feed into one barcode per session.
//!
//! ```text
//! Idle ──start()──▶ Scanning ──first code (emitted)──▶ Idle
//!                      │
//!                      └──cancel() / stream closed──▶ Idle
//! ```
//!
//! The camera reports every frame in which it recognizes something, so the
//! same physical barcode shows up many times in a row. The controller keeps
//! only the first code of the first non-empty frame and releases the camera
//! immediately, which is what lets downstream code treat a scan as a single
//! event.

use tokio::sync::mpsc;

use crate::ports::{Camera, CameraError, CodeReport, Symbology};

/// Lifecycle of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
///
/// Completing a session is not a resting state: the frame that carries the
/// first code releases the camera and hands the code back in the same call,
/// leaving the controller idle again.
pub enum ScanState {
    Idle,
    Scanning,
}

/// Errors surfaced when starting a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// No capture device is present; manual entry is still possible.
    #[error("camera unavailable")]
    CameraUnavailable,

    /// The capture device could not be wired into a session.
    #[error("camera capture setup failed")]
    CaptureSetup(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A session is already running.
    #[error("a scan is already in progress")]
    AlreadyScanning,
}

impl From<CameraError> for ScanError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::Unavailable => Self::CameraUnavailable,
            CameraError::Setup(source) => Self::CaptureSetup(source),
        }
    }
}

/// State machine that owns the camera for the length of a session.
pub struct ScanController<C> {
    camera: C,
    state: ScanState,
    frames: Option<mpsc::UnboundedReceiver<CodeReport>>,
}

impl<C: Camera> ScanController<C> {
    /// Create an idle controller around `camera`.
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            state: ScanState::Idle,
            frames: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }


    /// Open a capture session.
    ///
    /// # Errors
    ///
    /// - [`ScanError::AlreadyScanning`] if a session is running; the running
    ///   session is left untouched.
    /// - [`ScanError::CameraUnavailable`] / [`ScanError::CaptureSetup`] if the
    ///   camera refuses; the controller stays idle.
    pub fn start(&mut self) -> Result<(), ScanError> {
        if self.state != ScanState::Idle {
            return Err(ScanError::AlreadyScanning);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if let Err(err) = self.camera.start_capture(&Symbology::ALL, tx) {
            tracing::warn!(%err, "failed to start barcode capture");
            return Err(err.into());
        }

        self.frames = Some(rx);
        self.state = ScanState::Scanning;
        tracing::debug!("barcode capture started");
        Ok(())
    }

    /// Abort the running session without emitting a code.
    ///
    /// Does nothing when idle.
    pub fn cancel(&mut self) {
        if self.state == ScanState::Scanning {
            self.release();
            tracing::debug!("barcode capture cancelled");
        }
    }

    /// Feed one camera frame to the state machine.
    ///
    /// Returns the scanned code when this frame completes the session. Only
    /// the first code of the frame is considered; frames received outside of
    /// [`ScanState::Scanning`] are ignored.
    pub fn handle_report(&mut self, codes: &[String]) -> Option<String> {
        if self.state != ScanState::Scanning {
            return None;
        }

        let code = codes.first().filter(|code| !code.is_empty())?.clone();

        self.release();
        tracing::debug!(%code, ignored = codes.len() - 1, "barcode captured");
        Some(code)
    }

    /// Wait for the session to produce its code.
    ///
    /// Returns `None` when idle, or when the camera closes the frame stream
    /// before recognizing anything (the session is released as if cancelled).
    pub async fn next_code(&mut self) -> Option<String> {
        while self.state == ScanState::Scanning {
            let frame = match self.frames.as_mut() {
                Some(rx) => rx.recv().await,
                None => None,
            };

            match frame {
                Some(codes) => {
                    if let Some(code) = self.handle_report(&codes) {
                        return Some(code);
                    }
                }
                None => {
                    tracing::debug!("camera closed the frame stream before a code was read");
                    self.release();
                }
            }
        }
        None
    }

    fn release(&mut self) {
        self.camera.stop_capture();
        self.frames = None;
        self.state = ScanState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CameraLog {
        starts: usize,
        stops: usize,
        active: bool,
        sender: Option<mpsc::UnboundedSender<CodeReport>>,
        symbologies: Vec<Symbology>,
    }

    #[derive(Clone)]
    struct FakeCamera {
        log: Arc<Mutex<CameraLog>>,
        failure: Option<fn() -> CameraError>,
    }

    impl FakeCamera {
        fn working() -> Self {
            Self {
                log: Arc::default(),
                failure: None,
            }
        }

        fn failing(failure: fn() -> CameraError) -> Self {
            Self {
                log: Arc::default(),
                failure: Some(failure),
            }
        }

        fn push(&self, codes: &[&str]) {
            let log = self.log.lock().unwrap();
            if let Some(tx) = log.sender.as_ref() {
                let _ = tx.send(codes.iter().map(|c| (*c).to_string()).collect());
            }
        }

        fn close_stream(&self) {
            self.log.lock().unwrap().sender = None;
        }

        fn starts(&self) -> usize {
            self.log.lock().unwrap().starts
        }

        fn stops(&self) -> usize {
            self.log.lock().unwrap().stops
        }

        fn is_active(&self) -> bool {
            self.log.lock().unwrap().active
        }
    }

    impl Camera for FakeCamera {
        fn start_capture(
            &mut self,
            symbologies: &[Symbology],
            frames: mpsc::UnboundedSender<CodeReport>,
        ) -> Result<(), CameraError> {
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            let mut log = self.log.lock().unwrap();
            log.starts += 1;
            log.active = true;
            log.sender = Some(frames);
            log.symbologies = symbologies.to_vec();
            Ok(())
        }

        fn stop_capture(&mut self) {
            let mut log = self.log.lock().unwrap();
            if log.active {
                log.stops += 1;
            }
            log.active = false;
        }
    }

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn should_start_idle() {
        let controller = ScanController::new(FakeCamera::working());
        assert_eq!(controller.state(), ScanState::Idle);
    }

    #[test]
    fn should_request_grocery_symbologies_when_starting() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();
        assert_eq!(
            camera.log.lock().unwrap().symbologies,
            Symbology::ALL.to_vec()
        );
    }

    #[test]
    fn should_take_first_code_when_frame_reports_two() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();

        let code = controller.handle_report(&codes(&["4006381333931", "96385074"]));

        assert_eq!(code.as_deref(), Some("4006381333931"));
        assert_eq!(controller.state(), ScanState::Idle);
        assert!(!camera.is_active());
        assert_eq!(camera.stops(), 1);
    }

    #[test]
    fn should_ignore_frames_after_completion() {
        let mut controller = ScanController::new(FakeCamera::working());
        controller.start().unwrap();
        assert!(controller.handle_report(&codes(&["111"])).is_some());
        assert!(controller.handle_report(&codes(&["111"])).is_none());
    }

    #[test]
    fn should_keep_scanning_on_empty_frame() {
        let mut controller = ScanController::new(FakeCamera::working());
        controller.start().unwrap();
        assert!(controller.handle_report(&[]).is_none());
        assert!(controller.handle_report(&codes(&[""])).is_none());
        assert_eq!(controller.state(), ScanState::Scanning);
    }

    #[test]
    fn should_ignore_frames_when_idle() {
        let mut controller = ScanController::new(FakeCamera::working());
        assert!(controller.handle_report(&codes(&["111"])).is_none());
    }

    #[test]
    fn should_reject_second_start_without_opening_another_session() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();

        let result = controller.start();

        assert!(matches!(result, Err(ScanError::AlreadyScanning)));
        assert_eq!(camera.starts(), 1);
        assert_eq!(controller.state(), ScanState::Scanning);
    }

    #[test]
    fn should_stay_idle_when_camera_unavailable() {
        let mut controller = ScanController::new(FakeCamera::failing(|| CameraError::Unavailable));
        let result = controller.start();
        assert!(matches!(result, Err(ScanError::CameraUnavailable)));
        assert_eq!(controller.state(), ScanState::Idle);
    }

    #[test]
    fn should_stay_idle_when_capture_setup_fails() {
        let mut controller = ScanController::new(FakeCamera::failing(|| {
            CameraError::Setup("output rejected".into())
        }));
        let result = controller.start();
        assert!(matches!(result, Err(ScanError::CaptureSetup(_))));
        assert_eq!(controller.state(), ScanState::Idle);
    }

    #[test]
    fn should_release_camera_on_cancel() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();

        controller.cancel();

        assert_eq!(controller.state(), ScanState::Idle);
        assert!(!camera.is_active());
        assert!(controller.handle_report(&codes(&["111"])).is_none());
    }

    #[test]
    fn should_ignore_cancel_when_idle() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.cancel();
        assert_eq!(camera.stops(), 0);
    }

    #[test]
    fn should_allow_a_new_session_after_completion() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();
        controller.handle_report(&codes(&["111"]));

        controller.start().unwrap();

        assert_eq!(camera.starts(), 2);
        assert_eq!(controller.state(), ScanState::Scanning);
    }

    #[tokio::test]
    async fn should_emit_exactly_one_code_from_streamed_frames() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();

        camera.push(&[]);
        camera.push(&["5000112637922", "0001"]);
        camera.push(&["5000112637922"]);

        assert_eq!(controller.next_code().await.as_deref(), Some("5000112637922"));
        assert_eq!(controller.state(), ScanState::Idle);
        assert!(controller.next_code().await.is_none());
    }

    #[tokio::test]
    async fn should_release_session_when_stream_closes() {
        let camera = FakeCamera::working();
        let mut controller = ScanController::new(camera.clone());
        controller.start().unwrap();

        camera.close_stream();

        assert!(controller.next_code().await.is_none());
        assert_eq!(controller.state(), ScanState::Idle);
        assert!(!camera.is_active());
    }
}
