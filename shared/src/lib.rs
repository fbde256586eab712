pub mod bindings;
pub mod board;
pub mod color;
pub mod error;
pub mod label;
pub mod protocol;
pub mod raster;

pub use bindings::VariableBindings;
pub use board::{Board, PendingReveal, Submission, REVEAL_DELAY_MS};
pub use color::{Rgb, SWATCHES};
pub use error::{RasterError, SubmitError};
pub use label::{format_label, LabelId, OverlayLabel, RecognitionResult};
pub use protocol::{CalculateRequest, CalculateResponse, ClientConfig, RecognitionEntry};
pub use raster::{DirtyRect, PixelBounds, Raster};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.is_finite() {
        return None;
    }
    Some(point)
}
