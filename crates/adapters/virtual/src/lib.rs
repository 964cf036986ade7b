//! # fridge-adapter-virtual
//!
//! Virtual camera that stands in for real capture hardware.
//!
//! | Source | Behaviour |
//! |--------|-----------|
//! | [`VirtualCamera::scripted`] | Emits a fixed list of frames as soon as capture starts |
//! | [`VirtualCamera::from_reader`] | Treats every line read from an async reader (e.g. stdin) as one frame |
//! | [`VirtualCamera::unplugged`] | Refuses to start, like a host without a camera |
//!
//! Frames are run through the [`recognizer`] so only codes of the requested
//! symbologies are reported, and frames without any recognized code are not
//! sent at all.
//!
//! ## Dependency rule
//!
//! Depends on `fridge-app` (port traits) only.

pub mod recognizer;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use fridge_app::ports::{Camera, CameraError, CodeReport, Symbology};

type SharedReader = Arc<Mutex<Box<dyn AsyncBufRead + Send + Unpin>>>;

enum Source {
    Scripted(Vec<String>),
    Reader(SharedReader),
    Unplugged,
}

/// A [`Camera`] whose frames come from text instead of an image sensor.
pub struct VirtualCamera {
    source: Source,
    task: Option<JoinHandle<()>>,
}

impl VirtualCamera {
    /// A camera that reports `frames` (one text line per frame) on every
    /// session.
    #[must_use]
    pub fn scripted<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: Source::Scripted(frames.into_iter().map(Into::into).collect()),
            task: None,
        }
    }

    /// A camera that reads one frame per line from `reader`.
    ///
    /// The reader is shared across sessions; a session ends when the reader
    /// reaches end of input.
    #[must_use]
    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        Self {
            source: Source::Reader(Arc::new(Mutex::new(Box::new(reader)))),
            task: None,
        }
    }

    /// A camera that is not connected.
    #[must_use]
    pub fn unplugged() -> Self {
        Self {
            source: Source::Unplugged,
            task: None,
        }
    }

    /// Whether a capture session is currently running.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Camera for VirtualCamera {
    fn start_capture(
        &mut self,
        symbologies: &[Symbology],
        frames: mpsc::UnboundedSender<CodeReport>,
    ) -> Result<(), CameraError> {
        let symbologies = symbologies.to_vec();
        if symbologies.is_empty() {
            return Err(CameraError::Setup("no symbology requested".into()));
        }

        match &self.source {
            Source::Unplugged => Err(CameraError::Unavailable),
            Source::Scripted(lines) => {
                for line in lines {
                    let report = recognizer::recognize(line, &symbologies);
                    if !report.is_empty() && frames.send(report).is_err() {
                        break;
                    }
                }
                Ok(())
            }
            Source::Reader(reader) => {
                let handle = tokio::runtime::Handle::try_current()
                    .map_err(|err| CameraError::Setup(Box::new(err)))?;
                let reader = Arc::clone(reader);
                self.task = Some(handle.spawn(read_frames(reader, symbologies, frames)));
                tracing::debug!("virtual camera capturing from reader");
                Ok(())
            }
        }
    }

    fn stop_capture(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("virtual camera stopped");
        }
    }
}

impl Drop for VirtualCamera {
    fn drop(&mut self) {
        self.stop_capture();
    }
}

async fn read_frames(
    reader: SharedReader,
    symbologies: Vec<Symbology>,
    frames: mpsc::UnboundedSender<CodeReport>,
) {
    let mut reader = reader.lock().await;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let report = recognizer::recognize(&line, &symbologies);
                if report.is_empty() {
                    tracing::trace!(line = line.trim_end(), "no barcode recognized in frame");
                    continue;
                }
                if frames.send(report).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(%err, "virtual camera input failed");
                break;
            }
        }
    }
}
