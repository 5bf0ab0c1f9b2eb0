use std::time::Instant;

use crate::annotation::domain::frame_painter::{
    FramePainter, EYE_COLOR, FACE_COLOR, OUTLINE_THICKNESS,
};
use crate::detection::domain::classifier::Classifier;
use crate::shared::constants::{
    EYE_DETECT_PARAMS, FACE_COUNT_ORIGIN, FACE_COUNT_PREFIX, FACE_DETECT_PARAMS, FACE_LABEL,
};
use crate::shared::frame::Frame;
use crate::shared::region::{EyeMark, Region, RegionKind};

const LABEL_SCALE: f32 = 0.5;
const LABEL_LIFT: i32 = 10;
const COUNT_SCALE: f32 = 0.7;

/// Outcome of one detection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionReport {
    /// Faces in the order the detector returned them.
    pub faces: Vec<Region>,
    /// Eye circles, in full-frame coordinates.
    pub eyes: Vec<EyeMark>,
}

impl DetectionReport {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn overlay_text(&self) -> String {
        format!("{FACE_COUNT_PREFIX}{}", self.face_count())
    }
}

/// Detects faces (and eyes within them) and draws the overlays.
///
/// Each face gets a rectangle and a label; each eye found inside a face
/// crop gets a circle; the total face count is written in the top-left
/// corner.
pub struct AnnotateFacesUseCase {
    painter: Box<dyn FramePainter>,
}

impl AnnotateFacesUseCase {
    pub fn new(painter: Box<dyn FramePainter>) -> Self {
        Self { painter }
    }

    /// Runs detection on `frame` and annotates it in place.
    ///
    /// The eye classifier is only consulted when given; callers pass `None`
    /// for a missing or empty eye cascade.
    pub fn execute(
        &mut self,
        frame: &mut Frame,
        face_classifier: &mut dyn Classifier,
        mut eye_classifier: Option<&mut dyn Classifier>,
    ) -> Result<DetectionReport, Box<dyn std::error::Error>> {
        let started = Instant::now();
        let gray = frame.to_gray();

        let faces: Vec<Region> = face_classifier
            .detect(&gray, &FACE_DETECT_PARAMS)?
            .into_iter()
            .map(|r| Region {
                kind: RegionKind::Face,
                ..r
            })
            .collect();

        let mut eyes = Vec::new();
        for face in &faces {
            self.painter
                .rectangle(frame, face, FACE_COLOR, OUTLINE_THICKNESS)?;
            self.painter.text(
                frame,
                FACE_LABEL,
                (face.x, face.y - LABEL_LIFT),
                LABEL_SCALE,
                FACE_COLOR,
            )?;

            let Some(eye_classifier) = eye_classifier.as_deref_mut() else {
                continue;
            };
            let Some(crop_region) = face.clamp_to(gray.width(), gray.height()) else {
                continue;
            };
            let crop = image::imageops::crop_imm(
                &gray,
                crop_region.x as u32,
                crop_region.y as u32,
                crop_region.width as u32,
                crop_region.height as u32,
            )
            .to_image();

            for eye in eye_classifier.detect(&crop, &EYE_DETECT_PARAMS)? {
                let eye = Region {
                    kind: RegionKind::Eye,
                    ..eye
                };
                let mark = EyeMark::from_eye_in_face(&crop_region, &eye);
                if !crop_region.contains_point(mark.center) {
                    log::debug!("Discarding eye outside its face: {eye:?}");
                    continue;
                }
                self.painter
                    .circle(frame, mark.center, mark.radius, EYE_COLOR, OUTLINE_THICKNESS)?;
                eyes.push(mark);
            }
        }

        let report = DetectionReport { faces, eyes };
        self.painter.text(
            frame,
            &report.overlay_text(),
            FACE_COUNT_ORIGIN,
            COUNT_SCALE,
            FACE_COLOR,
        )?;

        log::debug!(
            "Frame {}: {} faces, {} eyes in {:.1}ms",
            frame.index(),
            report.face_count(),
            report.eyes.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(report)
    }
}
