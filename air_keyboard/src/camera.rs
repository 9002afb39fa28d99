//! Webcam capture and hand-landmark detection (feature = "camera").
//!
//! Frames come from `nokhwa`; hands come from a 21-point hand-landmark
//! ONNX model run with `tract`.  The model takes a `1×224×224×3` RGB
//! tensor in `[0, 1]` and returns 63 landmark values (x, y, z per joint,
//! in input pixels) plus a hand-presence score.  Frames are letterboxed
//! into the input so the hand keeps its proportions.

use std::path::Path;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{info, warn};
use tract_onnx::prelude::*;

use crate::config::{CameraConfig, DetectorConfig};
use crate::decode::{hands_from_outputs, Letterbox};
use crate::error::{Error, Result};
use crate::hand::Hand;
use crate::source::{Capture, Frame, HandSource, WindowInput};

const MODEL_INPUT: usize = 224;
const REQUESTED_FPS: u32 = 30;

fn model_err(e: impl std::fmt::Display) -> Error  { Error::Model(e.to_string()) }
fn camera_err(e: impl std::fmt::Display) -> Error { Error::Camera(e.to_string()) }

// ════════════════════════════════════════════════════════════════════════════
// LandmarkModel
// ════════════════════════════════════════════════════════════════════════════

pub struct LandmarkModel {
    plan: TypedRunnableModel<TypedModel>,
}

impl LandmarkModel {
    pub fn load(path: &Path) -> Result<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, MODEL_INPUT, MODEL_INPUT, 3]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(model_err)?;
        info!(path = %path.display(), "loaded hand-landmark model");
        Ok(LandmarkModel { plan })
    }

    /// Run the model on `frame`; landmarks come back in frame pixels.
    pub fn detect(&self, frame: &Frame, min_score: f32, max_hands: usize) -> Result<Vec<Hand>> {
        if frame.is_empty() || max_hands == 0 {
            return Ok(Vec::new());
        }

        let letterbox = Letterbox::fit(frame.width(), frame.height(), MODEL_INPUT);
        let input: Tensor = tract_ndarray::Array4::<f32>::from_shape_fn(
            (1, MODEL_INPUT, MODEL_INPUT, 3),
            |(_, y, x, c)| match letterbox.source_pixel(x, y) {
                Some((fx, fy)) => {
                    let shift = 16 - 8 * c as u32;
                    ((frame.sample(fx, fy) >> shift) & 0xFF) as f32 / 255.0
                }
                None => 0.0,
            },
        ).into();

        let outputs = self.plan.run(tvec!(input.into())).map_err(model_err)?;
        let outputs = outputs.iter()
            .map(|out| Ok(out.to_array_view::<f32>().map_err(model_err)?.iter().copied().collect()))
            .collect::<Result<Vec<Vec<f32>>>>()?;

        hands_from_outputs(&outputs, &letterbox, min_score, max_hands)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraHandSource
// ════════════════════════════════════════════════════════════════════════════

pub struct CameraHandSource {
    camera:     Camera,
    model:      LandmarkModel,
    mirror:     bool,
    confidence: f32,
    max_hands:  usize,
}

impl CameraHandSource {
    pub fn open(camera_cfg: &CameraConfig, detector_cfg: &DetectorConfig) -> Result<Self> {
        let model_path = detector_cfg.model_path.as_deref()
            .ok_or_else(|| model_err("no hand-landmark model configured (use --model)"))?;
        let model = LandmarkModel::load(model_path)?;

        let format = CameraFormat::new(
            Resolution::new(camera_cfg.width, camera_cfg.height),
            FrameFormat::MJPEG,
            REQUESTED_FPS,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));
        let mut camera = Camera::new(CameraIndex::Index(camera_cfg.index), requested)
            .map_err(camera_err)?;
        camera.open_stream().map_err(camera_err)?;

        let res = camera.resolution();
        info!(
            index = camera_cfg.index,
            width = res.width(),
            height = res.height(),
            "camera stream open"
        );

        Ok(CameraHandSource {
            camera,
            model,
            mirror:     camera_cfg.mirror,
            confidence: detector_cfg.detection_confidence,
            max_hands:  detector_cfg.max_hands,
        })
    }
}

impl HandSource for CameraHandSource {
    fn name(&self) -> &str { "webcam" }

    fn next_capture(&mut self, _input: &WindowInput) -> Result<Option<Capture>> {
        let buffer = self.camera.frame().map_err(camera_err)?;
        let image  = buffer.decode_image::<RgbFormat>().map_err(camera_err)?;
        let mut frame = Frame::from_rgb(image.width() as usize, image.height() as usize, image.as_raw());
        if self.mirror {
            frame.mirror_horizontal();
        }

        // A model failure on one frame is not fatal; carry on without hands.
        let hands = match self.model.detect(&frame, self.confidence, self.max_hands) {
            Ok(h)  => h,
            Err(e) => {
                warn!(error = %e, "hand detection failed");
                Vec::new()
            }
        };

        Ok(Some(Capture { frame: Some(frame), hands }))
    }
}

impl Drop for CameraHandSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            warn!(error = %e, "failed to stop camera stream");
        }
    }
}
