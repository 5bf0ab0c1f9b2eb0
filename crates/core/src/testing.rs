//! In-memory fakes shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::GrayImage;

use crate::annotation::domain::frame_painter::{Color, FramePainter};
use crate::capture::domain::frame_source::{FrameSource, FrameStream};
use crate::detection::domain::classifier::{Classifier, ClassifierLoader, DetectParams};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

pub fn solid_frame(width: u32, height: u32, index: usize) -> Frame {
    Frame::new(
        vec![128u8; (width * height * 3) as usize],
        width,
        height,
        3,
        index,
    )
}

/// One call made to a fake classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectCall {
    pub image_size: (u32, u32),
    pub params: DetectParams,
}

/// Classifier returning scripted results, one entry per `detect` call.
///
/// Once the script is exhausted every call returns `fallback`.
pub struct FakeClassifier {
    pub path: PathBuf,
    pub empty: bool,
    pub script: VecDeque<Result<Vec<Region>, String>>,
    pub fallback: Vec<Region>,
    pub calls: Arc<Mutex<Vec<DetectCall>>>,
}

impl FakeClassifier {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            empty: false,
            script: VecDeque::new(),
            fallback: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn always(mut self, regions: Vec<Region>) -> Self {
        self.fallback = regions;
        self
    }

    pub fn then(mut self, result: Result<Vec<Region>, String>) -> Self {
        self.script.push_back(result);
        self
    }

    pub fn empty(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<DetectCall>>> {
        Arc::clone(&self.calls)
    }
}

impl Classifier for FakeClassifier {
    fn is_empty(&self) -> bool {
        self.empty
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn detect(
        &mut self,
        image: &GrayImage,
        params: &DetectParams,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        self.calls.lock().unwrap().push(DetectCall {
            image_size: image.dimensions(),
            params: *params,
        });
        match self.script.pop_front() {
            Some(Ok(regions)) => Ok(regions),
            Some(Err(message)) => Err(message.into()),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Loader handing out pre-registered classifiers by path.
#[derive(Default)]
pub struct FakeLoader {
    pub classifiers: Mutex<HashMap<PathBuf, FakeClassifier>>,
}

impl FakeLoader {
    pub fn with(self, classifier: FakeClassifier) -> Self {
        self.classifiers
            .lock()
            .unwrap()
            .insert(classifier.path.clone(), classifier);
        self
    }
}

impl ClassifierLoader for FakeLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Classifier>, Box<dyn std::error::Error>> {
        match self.classifiers.lock().unwrap().remove(path) {
            Some(classifier) => Ok(Box::new(classifier)),
            None => Err(format!("Cascade file not found: {}", path.display()).into()),
        }
    }
}

/// What happened to the streams a [`FakeSource`] handed out.
#[derive(Default, Debug)]
pub struct StreamLog {
    pub opened: usize,
    pub released: usize,
    pub reads: usize,
}

/// Source yielding scripted reads; `None` in the script is an empty grab.
pub struct FakeSource {
    pub available: bool,
    pub reads: VecDeque<Result<Option<Frame>, String>>,
    pub log: Arc<Mutex<StreamLog>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            available: true,
            reads: VecDeque::new(),
            log: Arc::new(Mutex::new(StreamLog::default())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn frames(mut self, count: usize, width: u32, height: u32) -> Self {
        for i in 0..count {
            self.reads.push_back(Ok(Some(solid_frame(width, height, i))));
        }
        self
    }

    pub fn then(mut self, read: Result<Option<Frame>, String>) -> Self {
        self.reads.push_back(read);
        self
    }

    pub fn log(&self) -> Arc<Mutex<StreamLog>> {
        Arc::clone(&self.log)
    }
}

impl FrameSource for FakeSource {
    fn open(
        &mut self,
        device_index: u32,
    ) -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>> {
        if !self.available {
            return Err(format!("Camera {device_index} could not be opened").into());
        }
        self.log.lock().unwrap().opened += 1;
        Ok(Box::new(FakeStream {
            reads: std::mem::take(&mut self.reads),
            log: Arc::clone(&self.log),
            released: false,
        }))
    }
}

struct FakeStream {
    reads: VecDeque<Result<Option<Frame>, String>>,
    log: Arc<Mutex<StreamLog>>,
    released: bool,
}

impl FrameStream for FakeStream {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        self.log.lock().unwrap().reads += 1;
        match self.reads.pop_front() {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(message)) => Err(message.into()),
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.log.lock().unwrap().released += 1;
        }
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// A single drawing call captured by [`RecordingPainter`].
#[derive(Clone, Debug, PartialEq)]
pub enum Stroke {
    Rectangle(Region, Color),
    Circle((i32, i32), i32, Color),
    Text(String, (i32, i32)),
}

/// Painter that records calls instead of touching pixels.
#[derive(Default, Clone)]
pub struct RecordingPainter {
    pub strokes: Arc<Mutex<Vec<Stroke>>>,
}

impl RecordingPainter {
    pub fn strokes(&self) -> Vec<Stroke> {
        self.strokes.lock().unwrap().clone()
    }

    pub fn rectangles(&self) -> Vec<Region> {
        self.strokes()
            .into_iter()
            .filter_map(|s| match s {
                Stroke::Rectangle(r, _) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<((i32, i32), i32)> {
        self.strokes()
            .into_iter()
            .filter_map(|s| match s {
                Stroke::Circle(c, r, _) => Some((c, r)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.strokes()
            .into_iter()
            .filter_map(|s| match s {
                Stroke::Text(t, _) => Some(t),
                _ => None,
            })
            .collect()
    }
}

impl FramePainter for RecordingPainter {
    fn rectangle(
        &mut self,
        _frame: &mut Frame,
        region: &Region,
        color: Color,
        _thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.strokes
            .lock()
            .unwrap()
            .push(Stroke::Rectangle(*region, color));
        Ok(())
    }

    fn circle(
        &mut self,
        _frame: &mut Frame,
        center: (i32, i32),
        radius: i32,
        color: Color,
        _thickness: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.strokes
            .lock()
            .unwrap()
            .push(Stroke::Circle(center, radius, color));
        Ok(())
    }

    fn text(
        &mut self,
        _frame: &mut Frame,
        text: &str,
        origin: (i32, i32),
        _scale: f32,
        _color: Color,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.strokes
            .lock()
            .unwrap()
            .push(Stroke::Text(text.to_string(), origin));
        Ok(())
    }
}
