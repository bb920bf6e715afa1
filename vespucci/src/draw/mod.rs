//! The draw-mode state machine and its measurement specialization.

use serde::{Deserialize, Serialize};

mod measure;
mod preview;
mod session;
mod shape;

pub use measure::{MeasureType, MeasurementSession, MeasurementUnit, RawMeasure};
pub use preview::PreviewShape;
pub use session::{DrawingSession, DrawingSessionConfig, PointHitPolicy, SessionState};
pub use shape::{PointId, Shape, ShapeId, ShapeStore};

/// Kind of shape a drawing session builds. Exactly one mode is active per session at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawMode {
    /// Single points, committed on every pick.
    Point,
    /// Polylines, committed on finalize.
    Line,
    /// Polygons (outer ring only), committed on finalize.
    Polygon,
    /// Single-point text labels, committed on every pick.
    Label,
}

impl DrawMode {
    /// Lowercase name of the mode, as used in exported properties.
    pub fn name(&self) -> &'static str {
        match self {
            DrawMode::Point => "point",
            DrawMode::Line => "line",
            DrawMode::Polygon => "polygon",
            DrawMode::Label => "label",
        }
    }
}
