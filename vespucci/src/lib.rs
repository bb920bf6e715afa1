//! Vespucci is the interactive drawing and measurement subsystem of a map application. It
//! turns streams of resolved ground picks delivered by a map viewer into styled vector
//! shapes (points, lines, polygons, text labels) and into geodetic measurements (surface
//! distance, ring area, projected coordinates).
//!
//! The crate deliberately knows nothing about rendering or window systems. The map viewer
//! is an external collaborator reached through the [`viewer::MapViewer`] capability trait:
//! it resolves screen gestures into [`viewer::PickEvent`]s and carries out cursor and
//! interaction-stack requests made by the sessions.
//!
//! # Drawing
//!
//! A [`draw::DrawingSession`] owns the draw-mode state machine. Entering a draw mode pushes
//! a pick interaction onto the viewer, after which every pick event grows the working point
//! list and updates a live preview shape. An explicit finalize freezes the working list into
//! a committed [`draw::Shape`] styled by the session's [`style::StyleModel`]:
//!
//! ```
//! use vespucci::draw::{DrawMode, DrawingSession, DrawingSessionConfig};
//! use vespucci::viewer::{testing::RecordingViewer, PickEvent};
//! use vespucci_types::GroundPoint;
//!
//! let mut viewer = RecordingViewer::default();
//! let mut session = DrawingSession::new(DrawingSessionConfig::default());
//!
//! session.enter_draw_mode(DrawMode::Line, &mut viewer);
//! session.handle_pick(&PickEvent::at(GroundPoint::new(45.0, 14.0)), &mut viewer);
//! session.handle_pick(&PickEvent::at(GroundPoint::new(45.1, 14.2)), &mut viewer);
//! let id = session.finalize(&mut viewer);
//!
//! assert!(id.is_some());
//! ```
//!
//! # Measuring
//!
//! A [`draw::MeasurementSession`] drives the same state machine in single-shot mode, but
//! instead of keeping styled entities it recomputes a displayed result string after every
//! point change, formatted by the selected [`draw::MeasurementUnit`].

pub mod color;
pub mod draw;
pub mod error;
#[cfg(feature = "geojson")]
pub mod export;
pub mod style;
pub mod viewer;

pub use color::Color;
pub use error::VespucciError;
