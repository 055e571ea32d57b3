//! Frame transforms.
//!
//! A transform is a plain function from a [`Frame`] to a [`Frame`]; transforms
//! are chained with [`compose`]. Frames are `[height, width, channels]` arrays
//! with one (luma) or three (RGB) channels.
use anyhow::{anyhow, bail, Result};
use arcade_core::Frame;
use image::{
    imageops::{grayscale, FilterType::Triangle},
    ImageBuffer, Luma, Rgb,
};
use ndarray::IxDyn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A shareable frame transform.
pub type ObsTransform = Arc<dyn Fn(Frame) -> Result<Frame> + Send + Sync>;

fn dims(frame: &Frame) -> Result<(u32, u32, usize)> {
    match frame.shape() {
        &[h, w, c] => Ok((h as u32, w as u32, c)),
        shape => bail!("Expected a [height, width, channels] frame, got {:?}", shape),
    }
}

/// Converts an RGB frame `[h, w, 3]` into a grayscale frame `[h, w, 1]`.
pub fn to_grayscale(frame: Frame) -> Result<Frame> {
    let (h, w, c) = dims(&frame)?;
    if c != 3 {
        bail!("Grayscale conversion needs 3 channels, got {}", c);
    }
    let raw = frame.iter().cloned().collect::<Vec<_>>();
    let img = ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, raw)
        .ok_or_else(|| anyhow!("Failed to create an RGB image of {}x{}", w, h))?;
    let img: ImageBuffer<Luma<u8>, Vec<u8>> = grayscale(&img);
    Ok(Frame::from_shape_vec(
        IxDyn(&[h as usize, w as usize, 1]),
        img.into_raw(),
    )?)
}

fn resize_frame(frame: Frame, height: u32, width: u32) -> Result<Frame> {
    let (h, w, c) = dims(&frame)?;
    let raw = frame.iter().cloned().collect::<Vec<_>>();
    let out = match c {
        1 => {
            let img = ImageBuffer::<Luma<u8>, _>::from_raw(w, h, raw)
                .ok_or_else(|| anyhow!("Failed to create a luma image of {}x{}", w, h))?;
            image::imageops::resize(&img, width, height, Triangle).into_raw()
        }
        3 => {
            let img = ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, raw)
                .ok_or_else(|| anyhow!("Failed to create an RGB image of {}x{}", w, h))?;
            image::imageops::resize(&img, width, height, Triangle).into_raw()
        }
        _ => bail!("Resizing supports 1 or 3 channels, got {}", c),
    };
    Ok(Frame::from_shape_vec(
        IxDyn(&[height as usize, width as usize, c]),
        out,
    )?)
}

/// Returns a transform resizing frames to `height` x `width` pixels.
pub fn resize(height: u32, width: u32) -> ObsTransform {
    Arc::new(move |frame| resize_frame(frame, height, width))
}

fn pass(frame: Frame) -> Result<Frame> {
    Ok(frame)
}

/// Returns the transform leaving frames unchanged.
pub fn identity() -> ObsTransform {
    Arc::new(pass)
}

/// Returns a transform applying `f` and then `g`.
pub fn compose(f: ObsTransform, g: ObsTransform) -> ObsTransform {
    Arc::new(move |frame| g(f(frame)?))
}

/// Configuration of the preprocessing pipeline.
///
/// Frames are resized first, then converted to grayscale.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FrameTransformConfig {
    /// Converts RGB frames to grayscale.
    pub grayscale: bool,

    /// Target `[height, width]`, if frames are resized.
    pub resize: Option<[u32; 2]>,
}

impl Default for FrameTransformConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            resize: None,
        }
    }
}

impl FrameTransformConfig {
    /// Sets if frames are converted to grayscale.
    pub fn grayscale(mut self, v: bool) -> Self {
        self.grayscale = v;
        self
    }

    /// Sets the target size.
    pub fn resize(mut self, height: u32, width: u32) -> Self {
        self.resize = Some([height, width]);
        self
    }

    /// Builds the transform.
    pub fn build(&self) -> ObsTransform {
        let mut transform = identity();
        if let Some([h, w]) = self.resize {
            transform = compose(transform, resize(h, w));
        }
        if self.grayscale {
            transform = compose(transform, Arc::new(to_grayscale));
        }
        transform
    }
}
