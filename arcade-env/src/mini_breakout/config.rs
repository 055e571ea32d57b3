//! Configuration of [`MiniBreakout`](super::MiniBreakout).
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`MiniBreakout`](super::MiniBreakout).
///
/// The field is a grid of `width` x `height` cells. Row 0 is empty, the
/// bricks fill the next `brick_rows` rows and the paddle moves on the bottom
/// row.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MiniBreakoutConfig {
    /// Number of columns.
    pub width: usize,

    /// Number of rows.
    pub height: usize,

    /// Number of brick rows.
    pub brick_rows: usize,

    /// Width of the paddle in cells.
    pub paddle_width: usize,

    /// Side of a cell in pixels.
    pub pixel_scale: usize,

    /// Episodes are cut after this number of steps.
    pub max_steps: usize,
}

impl Default for MiniBreakoutConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 12,
            brick_rows: 3,
            paddle_width: 3,
            pixel_scale: 4,
            max_steps: 2000,
        }
    }
}

impl MiniBreakoutConfig {
    /// Sets the size of the field in cells.
    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the number of brick rows.
    pub fn brick_rows(mut self, v: usize) -> Self {
        self.brick_rows = v;
        self
    }

    /// Sets the width of the paddle.
    pub fn paddle_width(mut self, v: usize) -> Self {
        self.paddle_width = v;
        self
    }

    /// Sets the pixels per cell.
    pub fn pixel_scale(mut self, v: usize) -> Self {
        self.pixel_scale = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Checks the field has room for the bricks, a free row and the paddle.
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 {
            bail!("width must be at least 2, got {}", self.width);
        }
        if self.brick_rows == 0 || self.height < self.brick_rows + 3 {
            bail!(
                "{} rows cannot hold {} brick rows, a free row and the paddle",
                self.height,
                self.brick_rows
            );
        }
        if self.paddle_width == 0 || self.paddle_width > self.width {
            bail!("paddle_width must be in 1..={}", self.width);
        }
        if self.pixel_scale == 0 || self.max_steps == 0 {
            bail!("pixel_scale and max_steps must be positive");
        }
        Ok(())
    }

    /// Constructs [`MiniBreakoutConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MiniBreakoutConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
