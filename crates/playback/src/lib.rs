use serde::{Deserialize, Serialize};
use thiserror::Error;

mod frame;
pub use frame::*;
mod scheduler;
pub use scheduler::*;
mod scroll;
pub use scroll::*;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("invalid scroll speed: {0}")]
    InvalidSpeed(f32),
}

/// 2D point in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D extent in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}
