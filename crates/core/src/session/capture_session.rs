use std::path::Path;
use std::time::Instant;

use crate::annotation::domain::frame_painter::FramePainter;
use crate::capture::domain::frame_source::{FrameSource, FrameStream};
use crate::detection::domain::classifier::{Classifier, ClassifierLoader};
use crate::detection::infrastructure::cascade_resolver::CascadePaths;
use crate::pipeline::annotate_faces_use_case::{AnnotateFacesUseCase, DetectionReport};
use crate::session::session_error::SessionError;
use crate::session::status::StatusMessage;
use crate::session::tick_scheduler::TickScheduler;
use crate::shared::constants::{DEFAULT_CAMERA_INDEX, TICK_INTERVAL};
use crate::shared::frame::Frame;
use crate::snapshot::domain::image_writer::ImageWriter;
use crate::snapshot::domain::snapshot_format::SnapshotFormat;

/// Public view of the capture state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
}

/// The open stream lives inside `Capturing`, so it exists exactly while
/// the session is capturing.
enum CaptureState {
    Idle,
    Capturing(Box<dyn FrameStream>),
}

/// What a single tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The session is idle; nothing was read.
    NotCapturing,
    /// Rejected by the scheduler because another tick overlapped it.
    Skipped,
    /// The read failed or produced an empty frame; see the status message.
    ReadFailed,
    /// A frame was displayed. `report` is `None` when no face classifier is
    /// active or detection failed.
    Displayed { report: Option<DetectionReport> },
}

/// Owns the camera stream, the classifiers and the displayed frame, and
/// drives the capture → detect → annotate → display cycle.
///
/// All operations run on the caller's thread. Every failure is mirrored
/// into [`CaptureSession::status`] and none of them ends the session.
pub struct CaptureSession {
    source: Box<dyn FrameSource>,
    loader: Box<dyn ClassifierLoader>,
    writer: Box<dyn ImageWriter>,
    annotator: AnnotateFacesUseCase,
    scheduler: TickScheduler,
    camera_index: u32,
    state: CaptureState,
    face_classifier: Option<Box<dyn Classifier>>,
    eye_classifier: Option<Box<dyn Classifier>>,
    displayed: Option<Frame>,
    last_report: Option<DetectionReport>,
    status: StatusMessage,
}

impl CaptureSession {
    pub fn new(
        source: Box<dyn FrameSource>,
        loader: Box<dyn ClassifierLoader>,
        writer: Box<dyn ImageWriter>,
        painter: Box<dyn FramePainter>,
    ) -> Self {
        Self {
            source,
            loader,
            writer,
            annotator: AnnotateFacesUseCase::new(painter),
            scheduler: TickScheduler::new(TICK_INTERVAL),
            camera_index: DEFAULT_CAMERA_INDEX,
            state: CaptureState::Idle,
            face_classifier: None,
            eye_classifier: None,
            displayed: None,
            last_report: None,
            status: StatusMessage::info("Ready - loading classifiers..."),
        }
    }

    pub fn with_camera_index(mut self, camera_index: u32) -> Self {
        self.camera_index = camera_index;
        self
    }

    /// Replaces the painter used for overlays from the next tick on.
    pub fn set_painter(&mut self, painter: Box<dyn FramePainter>) {
        self.annotator = AnnotateFacesUseCase::new(painter);
    }

    /// Takes effect on the next [`CaptureSession::start`].
    pub fn set_camera_index(&mut self, camera_index: u32) {
        self.camera_index = camera_index;
    }

    pub fn camera_index(&self) -> u32 {
        self.camera_index
    }

    pub fn state(&self) -> SessionState {
        match self.state {
            CaptureState::Idle => SessionState::Idle,
            CaptureState::Capturing(_) => SessionState::Capturing,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state() == SessionState::Capturing
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// The most recently displayed (annotated) frame.
    pub fn displayed_frame(&self) -> Option<&Frame> {
        self.displayed.as_ref()
    }

    pub fn last_report(&self) -> Option<&DetectionReport> {
        self.last_report.as_ref()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn face_classifier_path(&self) -> Option<&Path> {
        self.face_classifier.as_deref().map(|c| c.source_path())
    }

    pub fn eye_classifier_path(&self) -> Option<&Path> {
        self.eye_classifier.as_deref().map(|c| c.source_path())
    }

    /// Loads the startup cascades found by the cascade resolver.
    ///
    /// A missing or unusable face cascade is an error; a missing eye cascade
    /// only disables eye detection.
    pub fn load_default_classifiers(&mut self, paths: &CascadePaths) -> Result<(), SessionError> {
        let Some(face_path) = paths.face.as_deref() else {
            let err = SessionError::ClassifierNotFound;
            log::warn!("{err}");
            self.status = StatusMessage::error(err.to_string());
            return Err(err);
        };
        let face = match self.load_classifier(face_path) {
            Ok(face) => face,
            Err(e) => {
                log::warn!("{e}");
                self.status = StatusMessage::error("Face classifier could not be loaded");
                return Err(e);
            }
        };
        self.face_classifier = Some(face);
        self.status = StatusMessage::info("Face classifier loaded");
        log::info!("Face classifier loaded from {}", face_path.display());

        if let Some(eye_path) = paths.eye.as_deref() {
            match self.load_classifier(eye_path) {
                Ok(eye) => {
                    self.eye_classifier = Some(eye);
                    self.status =
                        StatusMessage::info(format!("{} - Eye classifier loaded", self.status));
                    log::info!("Eye classifier loaded from {}", eye_path.display());
                }
                Err(e) => log::warn!("Eye detection disabled: {e}"),
            }
        }

        self.status = StatusMessage::info("Classifiers loaded - ready to start camera");
        Ok(())
    }

    /// `Idle → Capturing`. A no-op while already capturing.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_capturing() {
            return Ok(());
        }
        let device = self.camera_index;
        let stream = self
            .source
            .open(device)
            .map_err(|source| SessionError::SourceOpen { device, source })
            .map_err(|e| self.fail(e))?;

        self.state = CaptureState::Capturing(stream);
        self.scheduler.reset();
        self.status = StatusMessage::info("Camera running...");
        log::info!("Capture started on camera {}", self.camera_index);
        Ok(())
    }

    /// `Capturing → Idle`: releases the stream and the displayed frame.
    ///
    /// Idempotent; does nothing while idle.
    pub fn stop(&mut self) {
        let CaptureState::Capturing(mut stream) =
            std::mem::replace(&mut self.state, CaptureState::Idle)
        else {
            return;
        };
        stream.release();
        drop(stream);
        self.displayed = None;
        self.last_report = None;
        self.scheduler.reset();
        self.status = StatusMessage::info("Camera stopped");
        log::info!("Capture stopped");
    }

    /// Runs one tick scheduled for now.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Runs the tick a timer scheduled at `scheduled`, unless the scheduler
    /// rejects it as overlapping.
    pub fn tick_at(&mut self, scheduled: Instant) -> TickOutcome {
        if !self.is_capturing() {
            return TickOutcome::NotCapturing;
        }
        if !self.scheduler.try_begin(scheduled) {
            return TickOutcome::Skipped;
        }
        let outcome = self.process_next_frame();
        self.scheduler.finish(Instant::now());
        outcome
    }

    fn process_next_frame(&mut self) -> TickOutcome {
        let CaptureState::Capturing(stream) = &mut self.state else {
            return TickOutcome::NotCapturing;
        };

        let mut frame = match stream.read() {
            Ok(Some(frame)) if !frame.is_empty() => frame,
            Ok(_) => {
                self.status = StatusMessage::error("Frame read failed: empty frame");
                log::debug!("Camera returned an empty frame");
                return TickOutcome::ReadFailed;
            }
            Err(e) => {
                self.status = StatusMessage::error(format!("Frame read failed: {e}"));
                log::warn!("Frame read failed: {e}");
                return TickOutcome::ReadFailed;
            }
        };

        let face = self
            .face_classifier
            .as_deref_mut()
            .filter(|c| !c.is_empty());
        let report = match face {
            Some(face) => {
                let eye = self
                    .eye_classifier
                    .as_mut()
                    .filter(|c| !c.is_empty())
                    .map(|c| &mut **c as &mut dyn Classifier);
                match self.annotator.execute(&mut frame, face, eye) {
                    Ok(report) => Some(report),
                    Err(e) => {
                        self.status = StatusMessage::error(format!("Face detection failed: {e}"));
                        log::warn!("Face detection failed: {e}");
                        None
                    }
                }
            }
            None => None,
        };

        // Replacing the slot drops the previously displayed frame.
        self.displayed = Some(frame);
        self.last_report = report.clone();
        TickOutcome::Displayed { report }
    }

    /// Writes the displayed frame to `path`, encoded by its extension.
    pub fn capture_snapshot(&mut self, path: &Path) -> Result<(), SessionError> {
        let result = self.write_snapshot(path);
        match result {
            Ok(()) => {
                let name = file_name(path);
                self.status = StatusMessage::info(format!("Image saved: {name}"));
                log::info!("Snapshot written to {}", path.display());
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn write_snapshot(&self, path: &Path) -> Result<(), SessionError> {
        let frame = self
            .displayed
            .as_ref()
            .filter(|f| !f.is_empty())
            .ok_or(SessionError::NoFrame)?;
        if SnapshotFormat::from_path(path).is_none() {
            return Err(SessionError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        self.writer
            .write(path, frame)
            .map_err(|source| SessionError::Save {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Swaps in a new face classifier; on failure the current one stays.
    pub fn reload_face_classifier(&mut self, path: &Path) -> Result<(), SessionError> {
        let classifier = self.load_classifier(path).map_err(|e| self.fail(e))?;
        self.face_classifier = Some(classifier);
        self.status = StatusMessage::info(format!("Classifier loaded: {}", file_name(path)));
        log::info!("Face classifier replaced by {}", path.display());
        Ok(())
    }

    /// Swaps in a new eye classifier; on failure the current one stays.
    pub fn reload_eye_classifier(&mut self, path: &Path) -> Result<(), SessionError> {
        let classifier = self.load_classifier(path).map_err(|e| self.fail(e))?;
        self.eye_classifier = Some(classifier);
        self.status = StatusMessage::info(format!("Eye classifier loaded: {}", file_name(path)));
        log::info!("Eye classifier replaced by {}", path.display());
        Ok(())
    }

    fn load_classifier(&self, path: &Path) -> Result<Box<dyn Classifier>, SessionError> {
        let classifier = self
            .loader
            .load(path)
            .map_err(|source| SessionError::ClassifierLoad {
                path: path.to_path_buf(),
                source,
            })?;
        if classifier.is_empty() {
            return Err(SessionError::EmptyClassifier {
                path: path.to_path_buf(),
            });
        }
        Ok(classifier)
    }

    /// Stops capture and releases both classifiers. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.stop();
        let had_classifiers = self.face_classifier.is_some() || self.eye_classifier.is_some();
        self.face_classifier = None;
        self.eye_classifier = None;
        if had_classifiers {
            log::debug!("Classifiers released");
        }
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        log::warn!("{error}");
        self.status = StatusMessage::error(error.to_string());
        error
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
