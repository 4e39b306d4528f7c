use serde::Serialize;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RectLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A right-anchored text label. `right_x` is the x coordinate the text ends
/// at; `center_y` is the vertical center of the text box.
#[derive(Debug, Clone, Serialize)]
pub struct LabelLayout {
    pub text: String,
    pub right_x: f64,
    pub center_y: f64,
    pub font_size: f64,
}

/// The curved flow band connecting the source rectangle to one branch
/// rectangle. The band's top edge is a cubic from `(start_x, source_top)` to
/// `(end_x, branch_top)`; the bottom edge runs `thickness` pixels below both
/// endpoints with the mirrored control geometry, so the band departs and
/// arrives horizontally.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BandLayout {
    pub start_x: f64,
    pub end_x: f64,
    pub source_top: f64,
    pub branch_top: f64,
    pub thickness: f64,
}

impl BandLayout {
    /// First control x: a quarter of the horizontal span past the source edge.
    pub fn control1_x(&self) -> f64 {
        self.start_x + (self.end_x - self.start_x) / 4.0
    }

    /// Second control x: a quarter of the horizontal span before the branch edge.
    pub fn control2_x(&self) -> f64 {
        self.end_x - (self.end_x - self.start_x) / 4.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceLayout {
    pub name: String,
    pub value: u64,
    pub rect: RectLayout,
    /// Full flow thickness in pixels (the drawn rect is one pixel shorter).
    pub thickness: f64,
    pub label: LabelLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchLayout {
    pub name: String,
    pub value: u64,
    /// 1-based display position; also the palette slot base for this branch.
    pub index: usize,
    pub rect: RectLayout,
    pub thickness: f64,
    pub band: BandLayout,
    pub label: LabelLayout,
}

/// Horizontal divider stroke across the branch rectangle column.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DividerLayout {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Complete geometry for one diagram at one canvas size.
///
/// Fully determined by (canvas size, dataset); recomputed from scratch on
/// every resize since every absolute position depends on `scale`.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramLayout {
    pub width: f64,
    pub height: f64,
    /// Magnitude units per pixel.
    pub scale: f64,
    /// Vertical spacing between adjacent branch rectangles; zero for a single
    /// branch. The source side has no gaps.
    pub gap: f64,
    /// Column width shared by the source and branch rectangles.
    pub node_width: f64,
    pub source: SourceLayout,
    pub branches: Vec<BranchLayout>,
    pub dividers: Vec<DividerLayout>,
}

/// Drawable primitives emitted by [`crate::render_diagram`], in paint order.
#[derive(Debug, Clone, Serialize)]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
    },
    Band {
        band: BandLayout,
        fill: String,
    },
    Text {
        text: String,
        right_x: f64,
        center_y: f64,
        font_size: f64,
        fill: String,
    },
}
