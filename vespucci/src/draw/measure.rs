use serde::{Deserialize, Serialize};
use vespucci_types::format::{format_elevation, group_thousands};
use vespucci_types::geodesic::Geodesic;
use vespucci_types::proj::{ProjectionRegistry, GAUSS_KRUEGER, GEOGRAPHIC, UTM};
use vespucci_types::{Datum, GeoPoint, GroundPoint};

use crate::draw::session::{DrawingSession, DrawingSessionConfig};
use crate::draw::{DrawMode, SessionState, ShapeId};
use crate::viewer::{MapViewer, PickEvent};

/// What a measurement session measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureType {
    /// Path length of a drawn line.
    Distance,
    /// Area of a drawn ring.
    Area,
    /// Coordinates of a single picked position.
    Position,
}

impl MeasureType {
    /// The draw mode used to collect points for this measure.
    pub fn draw_mode(&self) -> DrawMode {
        match self {
            MeasureType::Distance => DrawMode::Line,
            MeasureType::Area => DrawMode::Polygon,
            MeasureType::Position => DrawMode::Point,
        }
    }

    /// The measure a given draw mode produces, if any.
    pub fn for_mode(mode: DrawMode) -> Option<Self> {
        match mode {
            DrawMode::Line => Some(MeasureType::Distance),
            DrawMode::Polygon => Some(MeasureType::Area),
            DrawMode::Point => Some(MeasureType::Position),
            DrawMode::Label => None,
        }
    }

    /// Units offered for this measure, first one is the default.
    pub fn units(&self) -> &'static [MeasurementUnit] {
        match self {
            MeasureType::Distance => &[MeasurementUnit::Meters, MeasurementUnit::Kilometers],
            MeasureType::Area => &[
                MeasurementUnit::SquareMeters,
                MeasurementUnit::Hectares,
                MeasurementUnit::SquareKilometers,
            ],
            MeasureType::Position => &[
                MeasurementUnit::Geographic,
                MeasurementUnit::Utm,
                MeasurementUnit::GaussKrueger,
            ],
        }
    }
}

/// A named formatting of a raw measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementUnit {
    /// Distance in meters.
    Meters,
    /// Distance in kilometers.
    Kilometers,
    /// Area in square meters.
    SquareMeters,
    /// Area in hectares.
    Hectares,
    /// Area in square kilometers.
    SquareKilometers,
    /// Position as geographic degrees.
    Geographic,
    /// Position as UTM easting/northing.
    Utm,
    /// Position as Gauss-Krüger easting/northing.
    GaussKrueger,
}

impl MeasurementUnit {
    /// Display name of the unit.
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementUnit::Meters => "m",
            MeasurementUnit::Kilometers => "km",
            MeasurementUnit::SquareMeters => "m²",
            MeasurementUnit::Hectares => "ha",
            MeasurementUnit::SquareKilometers => "km²",
            MeasurementUnit::Geographic => "Geographic",
            MeasurementUnit::Utm => "UTM",
            MeasurementUnit::GaussKrueger => "Gauss-Krüger",
        }
    }

    /// The measure this unit formats.
    pub fn measure_type(&self) -> MeasureType {
        match self {
            MeasurementUnit::Meters | MeasurementUnit::Kilometers => MeasureType::Distance,
            MeasurementUnit::SquareMeters
            | MeasurementUnit::Hectares
            | MeasurementUnit::SquareKilometers => MeasureType::Area,
            MeasurementUnit::Geographic | MeasurementUnit::Utm | MeasurementUnit::GaussKrueger => {
                MeasureType::Position
            }
        }
    }
}

/// The raw value of a measurement, kept so a unit switch can re-format without
/// re-measuring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawMeasure {
    /// Path length in meters.
    Length(f64),
    /// Ring area in square meters.
    Area(f64),
    /// A picked position.
    Position(GroundPoint),
}

/// A drawing session specialization that measures instead of keeping styled entities.
///
/// Every point change recomputes the raw measure and pushes a freshly formatted result
/// string; switching the unit re-formats the stored raw value.
pub struct MeasurementSession {
    session: DrawingSession,
    measure_type: MeasureType,
    geodesic: Geodesic,
    registry: ProjectionRegistry,
    unit: MeasurementUnit,
    last_raw: Option<RawMeasure>,
    result: String,
}

impl MeasurementSession {
    /// Creates a measurement session for the given measure.
    pub fn new(measure_type: MeasureType) -> Self {
        let config = DrawingSessionConfig::default().with_multi_shape(false);
        Self {
            session: DrawingSession::new(config),
            measure_type,
            geodesic: Geodesic::new(Datum::WGS84),
            registry: ProjectionRegistry::new(Datum::WGS84),
            unit: measure_type.units()[0],
            last_raw: None,
            result: String::new(),
        }
    }

    /// What this session measures.
    pub fn measure_type(&self) -> MeasureType {
        self.measure_type
    }

    /// The currently selected unit.
    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    /// The formatted result of the last measurement; empty while nothing was measured.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The raw value of the last measurement.
    pub fn raw(&self) -> Option<RawMeasure> {
        self.last_raw
    }

    /// The underlying drawing session, for preview and state inspection.
    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    /// Starts a fresh measurement, discarding the previous one.
    pub fn start(&mut self, viewer: &mut dyn MapViewer) {
        self.session.clear_shapes();
        self.last_raw = None;
        self.result.clear();
        self.session
            .enter_draw_mode(self.measure_type.draw_mode(), viewer);
    }

    /// Handles a pick event and recomputes the displayed result.
    pub fn handle_pick(&mut self, event: &PickEvent, viewer: &mut dyn MapViewer) {
        self.session.handle_pick(event, viewer);
        self.update_result();
    }

    /// Updates the floating point and recomputes the displayed result.
    pub fn set_floating_point(
        &mut self,
        position: Option<GroundPoint>,
        viewer: &mut dyn MapViewer,
    ) {
        self.session.set_floating_point(position, viewer);
        self.update_result();
    }

    /// Moves a working point (drag) and recomputes the displayed result.
    pub fn move_point(
        &mut self,
        id: crate::draw::PointId,
        position: GroundPoint,
        viewer: &mut dyn MapViewer,
    ) -> bool {
        let moved = self.session.move_point(id, position, viewer);
        if moved {
            self.update_result();
        }
        moved
    }

    /// Finalizes the measured geometry. The session stops drawing (measurement sessions
    /// are single-shot) but the result stays available.
    pub fn finalize(&mut self, viewer: &mut dyn MapViewer) -> Option<ShapeId> {
        let id = self.session.finalize(viewer);
        self.update_result();
        id
    }

    /// Stops measuring. The last result stays available.
    pub fn stop(&mut self, viewer: &mut dyn MapViewer) {
        self.session.stop_drawing(viewer);
    }

    /// Selects a different unit and re-formats the stored raw value without re-measuring.
    ///
    /// Units of a different measure type are ignored.
    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        if unit.measure_type() != self.measure_type {
            log::debug!(
                "unit {unit:?} ignored: session measures {:?}",
                self.measure_type
            );
            return;
        }

        self.unit = unit;
        if let Some(raw) = self.last_raw {
            self.result = self.format_raw(&raw);
        }
    }

    fn update_result(&mut self) {
        match self.compute_raw() {
            Some(raw) => {
                self.result = self.format_raw(&raw);
                self.last_raw = Some(raw);
            }
            None => {
                self.result.clear();
                self.last_raw = None;
            }
        }
    }

    fn compute_raw(&self) -> Option<RawMeasure> {
        match self.measure_type {
            MeasureType::Distance => {
                let points = self.live_points()?;
                Some(RawMeasure::Length(
                    self.geodesic.path_length(&points, false),
                ))
            }
            MeasureType::Area => {
                let points = self.live_points()?;
                Some(RawMeasure::Area(self.geodesic.polygon_area(&points)))
            }
            MeasureType::Position => {
                let shape = self.session.shapes().last()?;
                shape.points().first().copied().map(RawMeasure::Position)
            }
        }
    }

    /// The points the measure is computed over: the working list (plus floating point)
    /// while drawing, or the committed geometry after finalize.
    fn live_points(&self) -> Option<Vec<GroundPoint>> {
        if matches!(self.session.state(), SessionState::Drawing(_)) {
            let mut points = self.session.working_points().to_vec();
            if let Some(floating) = self.session.floating_point() {
                if points.last() != Some(&floating) {
                    points.push(floating);
                }
            }
            if points.is_empty() {
                return None;
            }
            Some(points)
        } else {
            let shape = self.session.shapes().last()?;
            Some(shape.points().to_vec())
        }
    }

    fn format_raw(&mut self, raw: &RawMeasure) -> String {
        match (raw, self.unit) {
            (RawMeasure::Length(meters), MeasurementUnit::Meters) => {
                format!("{} m", group_thousands(*meters, 2))
            }
            (RawMeasure::Length(meters), MeasurementUnit::Kilometers) => {
                format!("{:.3} km", meters / 1_000.0)
            }
            (RawMeasure::Area(sq_meters), MeasurementUnit::SquareMeters) => {
                format!("{} m²", group_thousands(*sq_meters, 1))
            }
            (RawMeasure::Area(sq_meters), MeasurementUnit::Hectares) => {
                format!("{:.3} ha", sq_meters / 10_000.0)
            }
            (RawMeasure::Area(sq_meters), MeasurementUnit::SquareKilometers) => {
                format!("{:.4} km²", sq_meters / 1_000_000.0)
            }
            (RawMeasure::Position(point), unit) => self.format_position(point, unit),
            _ => {
                // Unit/raw mismatch cannot normally happen; keep the previous text.
                self.result.clone()
            }
        }
    }

    fn format_position(&mut self, point: &GroundPoint, unit: MeasurementUnit) -> String {
        let projection_id = match unit {
            MeasurementUnit::Utm => UTM,
            MeasurementUnit::GaussKrueger => GAUSS_KRUEGER,
            _ => GEOGRAPHIC,
        };

        let coords = self.registry.project(point.lon(), point.lat(), projection_id);
        let mut text = match coords.zone {
            Some(zone) => format!("{zone} {} {}", coords.x, coords.y),
            None => format!("{}, {}", coords.y, coords.x),
        };

        if let Some(elevation) = format_elevation(point.height(), None) {
            text.push_str(", ");
            text.push_str(&elevation);
        }

        text
    }
}
