#![forbid(unsafe_code)]

//! Headless layout + SVG renderer for flow datasets.
//!
//! The pipeline is a pure function of its inputs: [`layout::compute_layout`]
//! turns a dataset and a canvas size into immutable geometry,
//! [`palette::PaletteAssignment`] resolves colors (with at most one random
//! draw per render pass), and [`render_diagram`] combines both into drawable
//! primitives. Hosts react to resize by calling [`render_diagram`] again and
//! discarding the previous primitives; nothing is patched incrementally.

pub mod layout;
pub mod model;
pub mod palette;
pub mod svg;
pub mod text;

use crate::model::{DiagramLayout, Primitive};
use crate::palette::PaletteAssignment;
use estuary_core::{FlowDataset, PaletteMode};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "palette cannot cover {branch_count} branches: no full color group fits the 85 palette entries"
    )]
    DegeneratePalette { branch_count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Seed for the palette draw (`Random`/`Unit` modes). `None` seeds from
    /// the OS; setting it makes renders reproducible.
    pub palette_seed: Option<u64>,
}

const DIVIDER_STROKE: &str = "black";
const LABEL_FILL: &str = "black";

/// Renders one diagram to drawable primitives.
///
/// Callable repeatedly for the same dataset across resizes; each call
/// recomputes the full geometry and redraws from scratch.
pub fn render_diagram(
    dataset: &FlowDataset,
    mode: PaletteMode,
    width: f64,
    height: f64,
    options: &RenderOptions,
) -> Result<Vec<Primitive>> {
    let layout = layout::compute_layout(dataset, width, height);

    let mut rng = match options.palette_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let colors = PaletteAssignment::resolve(layout.branches.len(), mode, &mut rng)?;

    Ok(emit_primitives(&layout, &colors))
}

/// [`render_diagram`] composed with the SVG writer.
pub fn render_diagram_svg(
    dataset: &FlowDataset,
    mode: PaletteMode,
    width: f64,
    height: f64,
    options: &RenderOptions,
    svg_options: &svg::SvgRenderOptions,
) -> Result<String> {
    let primitives = render_diagram(dataset, mode, width, height, options)?;
    Ok(svg::render_primitives_svg(
        &primitives,
        width,
        height,
        svg_options,
    ))
}

fn emit_primitives(layout: &DiagramLayout, colors: &PaletteAssignment) -> Vec<Primitive> {
    let mut out = Vec::new();

    for b in &layout.branches {
        out.push(Primitive::Rect {
            x: b.rect.x,
            y: b.rect.y,
            width: b.rect.width,
            height: b.rect.height,
            fill: colors.rect(b.index).to_string(),
        });
    }
    for d in &layout.dividers {
        out.push(Primitive::Line {
            x1: d.x1,
            y1: d.y1,
            x2: d.x2,
            y2: d.y2,
            stroke: DIVIDER_STROKE.to_string(),
        });
    }

    out.push(Primitive::Rect {
        x: layout.source.rect.x,
        y: layout.source.rect.y,
        width: layout.source.rect.width,
        height: layout.source.rect.height,
        fill: colors.source().to_string(),
    });
    out.push(Primitive::Text {
        text: layout.source.label.text.clone(),
        right_x: layout.source.label.right_x,
        center_y: layout.source.label.center_y,
        font_size: layout.source.label.font_size,
        fill: LABEL_FILL.to_string(),
    });

    for b in &layout.branches {
        out.push(Primitive::Band {
            band: b.band,
            fill: colors.band(b.index).to_string(),
        });
    }
    for b in &layout.branches {
        out.push(Primitive::Text {
            text: b.label.text.clone(),
            right_x: b.label.right_x,
            center_y: b.label.center_y,
            font_size: b.label.font_size,
            fill: LABEL_FILL.to_string(),
        });
    }

    out
}
