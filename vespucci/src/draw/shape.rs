use std::fmt;

use serde::{Deserialize, Serialize};
use vespucci_types::GroundPoint;

use crate::draw::DrawMode;
use crate::error::VespucciError;
use crate::style::Style;

/// Id of a committed shape, unique within its [`ShapeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub(crate) u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of a point in the working list of an active drawing session, used by the drag
/// collaborator to address the point it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub(crate) u64);

/// A committed, styled vector entity.
///
/// The point list is a snapshot frozen at commit time. For polygons it holds the ring
/// without the closing vertex; rendering and export append the first point again through
/// [`Shape::render_points`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: DrawMode,
    points: Vec<GroundPoint>,
    style: Style,
    label: Option<String>,
}

impl Shape {
    fn new(
        id: ShapeId,
        kind: DrawMode,
        points: Vec<GroundPoint>,
        style: Style,
        label: Option<String>,
    ) -> Result<Self, VespucciError> {
        let required = Self::min_points(kind);
        if points.len() < required {
            return Err(VespucciError::InsufficientPoints {
                kind,
                required,
                got: points.len(),
            });
        }

        Ok(Self {
            id,
            kind,
            points,
            style,
            label,
        })
    }

    /// Minimum number of points a shape of the given kind is valid with.
    pub fn min_points(kind: DrawMode) -> usize {
        match kind {
            DrawMode::Point | DrawMode::Label => 1,
            DrawMode::Line => 2,
            DrawMode::Polygon => 3,
        }
    }

    /// Id of the shape.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Kind of the shape, matching the draw mode that created it.
    pub fn kind(&self) -> DrawMode {
        self.kind
    }

    /// The stored point list. Polygons do not store the closing vertex.
    pub fn points(&self) -> &[GroundPoint] {
        &self.points
    }

    /// Style snapshot the shape was committed with.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Label text, for label shapes.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Points as rendered or exported: for polygons the first point is appended again to
    /// close the ring.
    pub fn render_points(&self) -> impl Iterator<Item = &GroundPoint> {
        let closing = match self.kind {
            DrawMode::Polygon => self.points.first(),
            _ => None,
        };
        self.points.iter().chain(closing)
    }
}

/// The committed shapes of one drawing session.
///
/// The store is owned by the session; collaborators read it through iterators and only the
/// session's finalize/delete operations mutate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    next_id: u64,
}

impl ShapeStore {
    /// Commits a new shape and returns its id.
    pub fn insert(
        &mut self,
        kind: DrawMode,
        points: Vec<GroundPoint>,
        style: Style,
        label: Option<String>,
    ) -> Result<ShapeId, VespucciError> {
        self.next_id += 1;
        let id = ShapeId(self.next_id);
        let shape = Shape::new(id, kind, points, style, label)?;
        self.shapes.push(shape);
        Ok(id)
    }

    /// Removes the shape with the given id.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// The shape with the given id.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    /// All shapes, in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Number of shapes in the store.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the store holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Removes all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::style::{PointStyle, PolygonStyle};

    fn point_style() -> Style {
        Style::Point(PointStyle::default())
    }

    #[test]
    fn insert_assigns_unique_ids() {
        let mut store = ShapeStore::default();
        let first = store
            .insert(
                DrawMode::Point,
                vec![GroundPoint::new(45.0, 14.0)],
                point_style(),
                None,
            )
            .expect("insert failed");
        let second = store
            .insert(
                DrawMode::Point,
                vec![GroundPoint::new(46.0, 15.0)],
                point_style(),
                None,
            )
            .expect("insert failed");

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_rejects_too_few_points() {
        let mut store = ShapeStore::default();
        let result = store.insert(
            DrawMode::Polygon,
            vec![GroundPoint::new(45.0, 14.0), GroundPoint::new(45.1, 14.0)],
            Style::Polygon(PolygonStyle::default()),
            None,
        );

        assert_matches!(
            result,
            Err(VespucciError::InsufficientPoints {
                kind: DrawMode::Polygon,
                required: 3,
                got: 2,
            })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn polygon_ring_closed_only_when_rendered() {
        let mut store = ShapeStore::default();
        let ring = vec![
            GroundPoint::new(45.0, 14.0),
            GroundPoint::new(45.0, 14.1),
            GroundPoint::new(45.1, 14.1),
        ];
        let id = store
            .insert(
                DrawMode::Polygon,
                ring.clone(),
                Style::Polygon(PolygonStyle::default()),
                None,
            )
            .expect("insert failed");

        let shape = store.get(id).expect("shape missing");
        assert_eq!(shape.points().len(), 3);

        let rendered: Vec<_> = shape.render_points().collect();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[3], &ring[0]);
    }

    #[test]
    fn remove_by_id() {
        let mut store = ShapeStore::default();
        let id = store
            .insert(
                DrawMode::Point,
                vec![GroundPoint::new(45.0, 14.0)],
                point_style(),
                None,
            )
            .expect("insert failed");

        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }
}
