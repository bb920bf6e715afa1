//! Fixed palettes offered by styling UIs.
//!
//! These are plain immutable data tables. The style model does not require chosen values
//! to come from here; a host is free to apply arbitrary values (for example an opacity
//! slider adjusting the alpha of a palette color).

use crate::color::Color;

/// Named colors offered by the styling UI.
pub const COLORS: [(&str, Color); 8] = [
    ("Red", Color::RED),
    ("Orange", Color::ORANGE),
    ("Yellow", Color::YELLOW),
    ("Green", Color::GREEN),
    ("Blue", Color::BLUE),
    ("Purple", Color::PURPLE),
    ("White", Color::WHITE),
    ("Black", Color::BLACK),
];

/// Point symbol sizes in pixels.
pub const POINT_SIZES: [f64; 5] = [4.0, 6.0, 8.0, 12.0, 16.0];

/// Line stroke widths in pixels.
pub const LINE_WIDTHS: [f64; 5] = [1.0, 2.0, 3.0, 5.0, 8.0];

/// Polygon outline widths in pixels.
pub const OUTLINE_WIDTHS: [f64; 4] = [0.0, 1.0, 2.0, 4.0];

/// Font families offered for text labels.
pub const FONT_FAMILIES: [&str; 3] = ["sans-serif", "serif", "monospace"];

/// Font sizes in points offered for text labels.
pub const FONT_SIZES: [f64; 4] = [10.0, 12.0, 16.0, 24.0];
