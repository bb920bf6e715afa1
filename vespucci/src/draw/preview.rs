use vespucci_types::GroundPoint;

use crate::draw::DrawMode;
use crate::style::Style;

/// The transient shape shown while a line or polygon is being drawn.
///
/// A preview is bound to the session's working point list plus an optional floating point
/// that follows the cursor. It is recomputed on every point change and destroyed/rebuilt
/// when the style of the in-progress kind changes; it is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewShape {
    kind: DrawMode,
    style: Style,
    points: Vec<GroundPoint>,
    floating: Option<GroundPoint>,
}

impl PreviewShape {
    /// Creates an empty preview for the given kind and style.
    pub fn new(kind: DrawMode, style: Style) -> Self {
        Self {
            kind,
            style,
            points: Vec::new(),
            floating: None,
        }
    }

    /// Kind of shape previewed.
    pub fn kind(&self) -> DrawMode {
        self.kind
    }

    /// Style the preview is rendered with.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replaces the previewed point list.
    pub fn set_points(&mut self, points: Vec<GroundPoint>) {
        self.points = points;
    }

    /// Committed points of the preview, without floating or closing vertices.
    pub fn points(&self) -> &[GroundPoint] {
        &self.points
    }

    /// Sets or clears the floating (cursor-following) point.
    pub fn set_floating(&mut self, floating: Option<GroundPoint>) {
        self.floating = floating;
    }

    /// Points as rendered: working points, then the floating point if set, and for
    /// polygons the first point again as closing vertex. The closing vertex is never
    /// stored as a real list entry.
    pub fn render_points(&self) -> Vec<GroundPoint> {
        let mut rendered = self.points.clone();
        if let Some(floating) = self.floating {
            rendered.push(floating);
        }
        if self.kind == DrawMode::Polygon {
            if let Some(&first) = rendered.first() {
                rendered.push(first);
            }
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{LineStyle, PolygonStyle};

    #[test]
    fn polygon_preview_closes_ring() {
        let mut preview = PreviewShape::new(DrawMode::Polygon, Style::Polygon(PolygonStyle::default()));
        preview.set_points(vec![
            GroundPoint::new(45.0, 14.0),
            GroundPoint::new(45.0, 14.1),
            GroundPoint::new(45.1, 14.1),
        ]);

        let rendered = preview.render_points();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[3], rendered[0]);
        assert_eq!(preview.points().len(), 3);
    }

    #[test]
    fn floating_point_precedes_closing_vertex() {
        let mut preview = PreviewShape::new(DrawMode::Polygon, Style::Polygon(PolygonStyle::default()));
        preview.set_points(vec![
            GroundPoint::new(45.0, 14.0),
            GroundPoint::new(45.0, 14.1),
        ]);
        preview.set_floating(Some(GroundPoint::new(45.1, 14.1)));

        let rendered = preview.render_points();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[2], GroundPoint::new(45.1, 14.1));
        assert_eq!(rendered[3], rendered[0]);
    }

    #[test]
    fn line_preview_is_not_closed() {
        let mut preview = PreviewShape::new(DrawMode::Line, Style::Line(LineStyle::default()));
        preview.set_points(vec![
            GroundPoint::new(45.0, 14.0),
            GroundPoint::new(45.0, 14.1),
        ]);
        assert_eq!(preview.render_points().len(), 2);
    }
}
