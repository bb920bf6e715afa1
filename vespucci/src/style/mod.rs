//! Shape styles, the style model and the fixed palettes.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::draw::DrawMode;

pub mod palette;

/// Style of point shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    /// Fill color of the point symbol.
    pub color: Color,
    /// Opacity in `0.0..=1.0`, applied on top of the color.
    pub opacity: f64,
    /// Diameter of the point symbol in pixels.
    pub size: f64,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            opacity: 1.0,
            size: 8.0,
        }
    }
}

/// Style of line shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Opacity in `0.0..=1.0`, applied on top of the color.
    pub opacity: f64,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            opacity: 1.0,
            width: 2.0,
        }
    }
}

/// Style of polygon shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    /// Fill color.
    pub color: Color,
    /// Opacity in `0.0..=1.0`, applied on top of the fill color.
    pub opacity: f64,
    /// Outline color.
    pub outline_color: Color,
    /// Outline width in pixels.
    pub outline_width: f64,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE.with_opacity(0.4),
            opacity: 1.0,
            outline_color: Color::BLUE,
            outline_width: 1.0,
        }
    }
}

/// Style of text labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Text color.
    pub color: Color,
    /// Opacity in `0.0..=1.0`, applied on top of the color.
    pub opacity: f64,
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub font_size: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 1.0,
            font_family: "sans-serif".into(),
            font_size: 12.0,
        }
    }
}

/// Style snapshot stored in a committed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Style {
    /// Point shape style.
    Point(PointStyle),
    /// Line shape style.
    Line(LineStyle),
    /// Polygon shape style.
    Polygon(PolygonStyle),
    /// Text label style.
    Label(LabelStyle),
}

impl Style {
    /// Base color of the style, whatever the shape kind.
    pub fn color(&self) -> Color {
        match self {
            Style::Point(style) => style.color,
            Style::Line(style) => style.color,
            Style::Polygon(style) => style.color,
            Style::Label(style) => style.color,
        }
    }
}

/// Partial style update; only the supplied fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    /// New base color.
    pub color: Option<Color>,
    /// New opacity.
    pub opacity: Option<f64>,
    /// New point size.
    pub size: Option<f64>,
    /// New line width.
    pub width: Option<f64>,
    /// New polygon outline color.
    pub outline_color: Option<Color>,
    /// New polygon outline width.
    pub outline_width: Option<f64>,
    /// New label font family.
    pub font_family: Option<String>,
    /// New label font size.
    pub font_size: Option<f64>,
}

impl StylePatch {
    /// Patch that only changes the base color.
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    /// Patch that only changes the opacity.
    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Default::default()
        }
    }
}

/// Holds the current style for each shape kind.
///
/// The current styles only affect shapes started after a change; committed shapes keep the
/// style they were created with. Rebuilding an in-progress preview after a change is the
/// drawing session's responsibility, invoked explicitly from its style setter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleModel {
    point: PointStyle,
    line: LineStyle,
    polygon: PolygonStyle,
    label: LabelStyle,
}

impl StyleModel {
    /// Current style for point shapes.
    pub fn point(&self) -> &PointStyle {
        &self.point
    }

    /// Current style for line shapes.
    pub fn line(&self) -> &LineStyle {
        &self.line
    }

    /// Current style for polygon shapes.
    pub fn polygon(&self) -> &PolygonStyle {
        &self.polygon
    }

    /// Current style for text labels.
    pub fn label(&self) -> &LabelStyle {
        &self.label
    }

    /// Snapshot of the current style for the given draw mode, as stored into new shapes.
    pub fn style_for(&self, mode: DrawMode) -> Style {
        match mode {
            DrawMode::Point => Style::Point(self.point.clone()),
            DrawMode::Line => Style::Line(self.line.clone()),
            DrawMode::Polygon => Style::Polygon(self.polygon.clone()),
            DrawMode::Label => Style::Label(self.label.clone()),
        }
    }

    /// Merges the patch into the current style of the given kind. Fields the patch does not
    /// supply keep their previous values.
    pub fn set_style(&mut self, mode: DrawMode, patch: &StylePatch) {
        match mode {
            DrawMode::Point => {
                if let Some(color) = patch.color {
                    self.point.color = color;
                }
                if let Some(opacity) = patch.opacity {
                    self.point.opacity = opacity;
                }
                if let Some(size) = patch.size {
                    self.point.size = size;
                }
            }
            DrawMode::Line => {
                if let Some(color) = patch.color {
                    self.line.color = color;
                }
                if let Some(opacity) = patch.opacity {
                    self.line.opacity = opacity;
                }
                if let Some(width) = patch.width {
                    self.line.width = width;
                }
            }
            DrawMode::Polygon => {
                if let Some(color) = patch.color {
                    self.polygon.color = color;
                }
                if let Some(opacity) = patch.opacity {
                    self.polygon.opacity = opacity;
                }
                if let Some(outline_color) = patch.outline_color {
                    self.polygon.outline_color = outline_color;
                }
                if let Some(outline_width) = patch.outline_width {
                    self.polygon.outline_width = outline_width;
                }
            }
            DrawMode::Label => {
                if let Some(color) = patch.color {
                    self.label.color = color;
                }
                if let Some(opacity) = patch.opacity {
                    self.label.opacity = opacity;
                }
                if let Some(font_family) = &patch.font_family {
                    self.label.font_family = font_family.clone();
                }
                if let Some(font_size) = patch.font_size {
                    self.label.font_size = font_size;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merge_keeps_unspecified_fields() {
        let mut model = StyleModel::default();
        let original_width = model.line().width;

        model.set_style(DrawMode::Line, &StylePatch::color(Color::GREEN));

        assert_eq!(model.line().color, Color::GREEN);
        assert_eq!(model.line().width, original_width);
    }

    #[test]
    fn patch_only_affects_its_kind() {
        let mut model = StyleModel::default();
        model.set_style(DrawMode::Line, &StylePatch::color(Color::GREEN));
        assert_ne!(model.polygon().color, Color::GREEN);
        assert_ne!(model.point().color, Color::GREEN);
    }

    #[test]
    fn arbitrary_values_are_accepted() {
        // The opacity slider produces values that are not in the palette.
        let mut model = StyleModel::default();
        model.set_style(DrawMode::Polygon, &StylePatch::opacity(0.33));
        assert_eq!(model.polygon().opacity, 0.33);
    }

    #[test]
    fn style_snapshot_matches_mode() {
        let model = StyleModel::default();
        assert!(matches!(model.style_for(DrawMode::Point), Style::Point(_)));
        assert!(matches!(model.style_for(DrawMode::Label), Style::Label(_)));
    }
}
