use std::path::Path;

use crate::foundation::error::{StepvizError, StepvizResult};

/// A time-addressable visual source sampled at reduced resolution.
///
/// `sample` returns a row-major grid of intensities, one byte per target
/// cell, where intensity is the mean of the source's RGB channels. IO and
/// decoding happen when a source is constructed; sampling itself never does
/// IO.
pub trait FrameSource {
    /// Native pixel dimensions.
    fn size(&self) -> (u32, u32);

    /// Nominal duration in seconds.
    fn duration_sec(&self) -> f64;

    /// Sample the source at `time_sec` into a `width`×`height` grid.
    fn sample(&self, time_sec: f64, width: u32, height: u32) -> Vec<u8>;
}

/// A raster image file as a time-invariant frame source.
///
/// Every instant shows the same frame; the nominal duration only drives the
/// player's position bookkeeping.
pub struct ImageSource {
    rgb: image::RgbImage,
    duration_sec: f64,
}

impl ImageSource {
    /// Decode an image file.
    pub fn open(path: &Path, duration_sec: f64) -> StepvizResult<Self> {
        let img = image::open(path).map_err(|e| {
            StepvizError::sample(format!("decode '{}': {e}", path.display()))
        })?;
        Ok(Self::from_image(img, duration_sec))
    }

    /// Wrap an already-decoded image.
    pub fn from_image(img: image::DynamicImage, duration_sec: f64) -> Self {
        Self {
            rgb: img.to_rgb8(),
            duration_sec: duration_sec.max(0.0),
        }
    }
}

impl FrameSource for ImageSource {
    fn size(&self) -> (u32, u32) {
        self.rgb.dimensions()
    }

    fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    fn sample(&self, _time_sec: f64, width: u32, height: u32) -> Vec<u8> {
        let small = image::imageops::resize(
            &self.rgb,
            width.max(1),
            height.max(1),
            image::imageops::FilterType::Triangle,
        );
        small
            .pixels()
            .map(|p| ((u16::from(p[0]) + u16::from(p[1]) + u16::from(p[2])) / 3) as u8)
            .collect()
    }
}

/// Deterministic procedural source: a diagonal gradient sweeping with time.
///
/// Exercises the player and its tests without media IO.
pub struct SweepSource {
    width: u32,
    height: u32,
    duration_sec: f64,
}

impl SweepSource {
    /// Create a sweep source with the given native size and duration.
    pub fn new(width: u32, height: u32, duration_sec: f64) -> StepvizResult<Self> {
        if width == 0 || height == 0 {
            return Err(StepvizError::validation("source size must be > 0"));
        }
        if !duration_sec.is_finite() || duration_sec <= 0.0 {
            return Err(StepvizError::validation(
                "source duration must be finite and > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            duration_sec,
        })
    }
}

impl FrameSource for SweepSource {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    fn sample(&self, time_sec: f64, width: u32, height: u32) -> Vec<u8> {
        let w = width.max(1);
        let h = height.max(1);
        let phase = (time_sec / self.duration_sec).clamp(0.0, 1.0);

        let mut out = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let gradient =
                    f64::from(x) / f64::from(w) * 0.5 + f64::from(y) / f64::from(h) * 0.5;
                let v = (gradient + phase).fract();
                out.push((v * 255.0) as u8);
            }
        }
        out
    }
}
