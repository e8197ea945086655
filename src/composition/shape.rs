//! Closed set of drawable primitives and their local geometry.
//!
//! Geometry is centered on the origin before the object transform
//! (translate, rotate, uniform scale) is applied.

use kurbo::Shape as _;

use crate::{
    animation::interp::VisualState,
    foundation::core::{Affine, BezPath, Point, Rect, Size},
};

/// Font size of text objects at scale 1.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Approximate advance of one glyph relative to the font size.
pub const GLYPH_ADVANCE: f64 = 0.6;

const PATH_TOLERANCE: f64 = 0.1;

/// Primitive type of a scene object.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circle of diameter `width`.
    #[default]
    Circle,
    /// Square of side `width`.
    Square,
    /// Isosceles triangle, apex up.
    Triangle,
    /// Axis-aligned rectangle.
    Rectangle,
    /// Centered label with no fill shape.
    Text,
    /// Container of child objects; draws nothing itself.
    Group,
}

impl ShapeKind {
    /// Case-insensitive lookup of a persisted type tag.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            "triangle" => Some(Self::Triangle),
            "rectangle" | "rect" => Some(Self::Rectangle),
            "text" => Some(Self::Text),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    /// Persisted type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Rectangle => "rectangle",
            Self::Text => "text",
            Self::Group => "group",
        }
    }

    /// Size used when a keyframe carries no explicit width/height.
    pub fn default_size(self) -> Size {
        match self {
            Self::Circle | Self::Square | Self::Triangle => Size::new(60.0, 60.0),
            Self::Rectangle => Size::new(120.0, 60.0),
            Self::Text => Size::new(GLYPH_ADVANCE * DEFAULT_FONT_SIZE, DEFAULT_FONT_SIZE),
            Self::Group => Size::ZERO,
        }
    }
}

/// Unscaled size of the shape's local box.
pub fn local_size(kind: ShapeKind, state: &VisualState) -> Size {
    let d = kind.default_size();
    match kind {
        ShapeKind::Circle => {
            let diameter = state.width.unwrap_or(d.width);
            Size::new(diameter, diameter)
        }
        ShapeKind::Square => {
            let side = state.width.unwrap_or(d.width);
            Size::new(side, side)
        }
        ShapeKind::Triangle | ShapeKind::Rectangle => Size::new(
            state.width.unwrap_or(d.width),
            state.height.unwrap_or(d.height),
        ),
        ShapeKind::Text => {
            let chars = state.text.chars().count().max(1) as f64;
            Size::new(
                state
                    .width
                    .unwrap_or(GLYPH_ADVANCE * DEFAULT_FONT_SIZE * chars),
                state.height.unwrap_or(DEFAULT_FONT_SIZE),
            )
        }
        ShapeKind::Group => Size::ZERO,
    }
}

/// Filled silhouette in local coordinates. `None` for text and groups.
pub fn local_path(kind: ShapeKind, state: &VisualState) -> Option<BezPath> {
    let size = local_size(kind, state);
    match kind {
        ShapeKind::Circle => {
            Some(kurbo::Circle::new(Point::ORIGIN, size.width / 2.0).to_path(PATH_TOLERANCE))
        }
        ShapeKind::Square | ShapeKind::Rectangle => {
            Some(Rect::from_center_size(Point::ORIGIN, size).to_path(PATH_TOLERANCE))
        }
        ShapeKind::Triangle => Some(triangle_path(size)),
        ShapeKind::Text | ShapeKind::Group => None,
    }
}

/// Stroke outline in local coordinates; an open-top rectangle leaves out its top edge.
pub fn outline_path(kind: ShapeKind, state: &VisualState) -> Option<BezPath> {
    if kind == ShapeKind::Rectangle && state.open_top {
        let r = Rect::from_center_size(Point::ORIGIN, local_size(kind, state));
        let mut path = BezPath::new();
        path.move_to((r.x0, r.y0));
        path.line_to((r.x0, r.y1));
        path.line_to((r.x1, r.y1));
        path.line_to((r.x1, r.y0));
        return Some(path);
    }
    local_path(kind, state)
}

fn triangle_path(size: Size) -> BezPath {
    let (hw, hh) = (size.width / 2.0, size.height / 2.0);
    let mut path = BezPath::new();
    path.move_to((0.0, -hh));
    path.line_to((hw, hh));
    path.line_to((-hw, hh));
    path.close_path();
    path
}

/// Local-to-canvas transform: translate, then rotate (degrees), then uniform scale.
pub fn object_affine(state: &VisualState) -> Affine {
    Affine::translate((state.x, state.y))
        * Affine::rotate(state.rotation.to_radians())
        * Affine::scale(state.scale)
}

/// Axis-aligned canvas bounds of the rotated, scaled shape.
pub fn world_bounds(kind: ShapeKind, state: &VisualState) -> Rect {
    let local = Rect::from_center_size(Point::ORIGIN, local_size(kind, state));
    object_affine(state).transform_rect_bbox(local)
}

/// Radius of the circle enclosing the shape's local box, in canvas units.
pub fn bounding_radius(kind: ShapeKind, state: &VisualState) -> f64 {
    let size = local_size(kind, state);
    match kind {
        ShapeKind::Circle => size.width / 2.0 * state.scale,
        _ => size.width.max(size.height) / 2.0 * state.scale,
    }
}

/// Hit test in canvas coordinates.
pub fn contains(kind: ShapeKind, state: &VisualState, point: Point) -> bool {
    if state.scale <= 0.0 {
        return false;
    }
    let local = object_affine(state).inverse() * point;
    match kind {
        ShapeKind::Group => false,
        ShapeKind::Text => Rect::from_center_size(Point::ORIGIN, local_size(kind, state))
            .contains(local),
        ShapeKind::Circle | ShapeKind::Square | ShapeKind::Triangle | ShapeKind::Rectangle => {
            local_path(kind, state).is_some_and(|p| p.contains(local))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/shape.rs"]
mod tests;
