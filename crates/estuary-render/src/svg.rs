use crate::model::Primitive;
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root `<svg id="...">`; lets several diagrams share one document tree.
    pub diagram_id: Option<String>,
    /// Dataset title, emitted as the SVG `<title>` element.
    pub title: Option<String>,
    /// CSS background color; transparent when unset.
    pub background: Option<String>,
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serializes primitives into a standalone SVG document.
///
/// The viewBox starts at the canvas size and grows to cover label overhang:
/// labels are right-anchored and can extend past the canvas's left edge for
/// long names, so their extent is estimated with the deterministic measurer.
pub fn render_primitives_svg(
    primitives: &[Primitive],
    width: f64,
    height: f64,
    options: &SvgRenderOptions,
) -> String {
    let measurer = DeterministicTextMeasurer::default();

    let mut min_x: f64 = 0.0;
    let mut min_y: f64 = 0.0;
    let mut max_y: f64 = height;
    for p in primitives {
        if let Primitive::Text {
            text,
            right_x,
            center_y,
            font_size,
            ..
        } = p
        {
            let metrics = measurer.measure(
                text,
                &TextStyle {
                    font_size: *font_size,
                },
            );
            min_x = min_x.min(right_x - metrics.width);
            min_y = min_y.min(center_y - metrics.height / 2.0);
            max_y = max_y.max(center_y + metrics.height / 2.0);
        }
    }

    let vb_w = (width - min_x).max(1.0);
    let vb_h = (max_y - min_y).max(1.0);

    let diagram_id = options.diagram_id.as_deref().unwrap_or("estuary");
    let background = options
        .background
        .as_deref()
        .map(|bg| format!(" background-color: {bg};"))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: {w}px;{background}" viewBox="{min_x} {min_y} {vb_w} {vb_h}">"#,
        id = escape_xml(diagram_id),
        w = fmt(vb_w),
        min_x = fmt(min_x),
        min_y = fmt(min_y),
        vb_w = fmt(vb_w),
        vb_h = fmt(vb_h),
    );
    if let Some(title) = options.title.as_deref() {
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(title));
    }

    out.push_str(r#"<g class="diagram">"#);
    for p in primitives {
        match p {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
                    x = fmt(*x),
                    y = fmt(*y),
                    w = fmt(*width),
                    h = fmt(*height),
                    fill = fill,
                );
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}"/>"#,
                    x1 = fmt(*x1),
                    y1 = fmt(*y1),
                    x2 = fmt(*x2),
                    y2 = fmt(*y2),
                    stroke = stroke,
                );
            }
            Primitive::Band { band, fill } => {
                // One filled polygon per band: cubic top edge, straight drop of
                // the band thickness, mirrored cubic back.
                let c1 = band.control1_x();
                let c2 = band.control2_x();
                let top0 = band.source_top;
                let top1 = band.branch_top;
                let bot0 = band.source_top + band.thickness;
                let bot1 = band.branch_top + band.thickness;
                let _ = write!(
                    &mut out,
                    r#"<path d="M{sx},{top0}C{c1},{top0},{c2},{top1},{ex},{top1}L{ex},{bot1}C{c2},{bot1},{c1},{bot0},{sx},{bot0}Z" fill="{fill}"/>"#,
                    sx = fmt(band.start_x),
                    ex = fmt(band.end_x),
                    c1 = fmt(c1),
                    c2 = fmt(c2),
                    top0 = fmt(top0),
                    top1 = fmt(top1),
                    bot0 = fmt(bot0),
                    bot1 = fmt(bot1),
                    fill = fill,
                );
            }
            Primitive::Text {
                text,
                right_x,
                center_y,
                font_size,
                fill,
            } => {
                let _ = write!(
                    &mut out,
                    r#"<text x="{x}" y="{y}" dy="0.35em" text-anchor="end" font-family="Arial" font-weight="bold" font-size="{size}" fill="{fill}">{text}</text>"#,
                    x = fmt(*right_x),
                    y = fmt(*center_y),
                    size = fmt(*font_size),
                    fill = fill,
                    text = escape_xml(text),
                );
            }
        }
    }
    out.push_str("</g>");
    out.push_str("</svg>");
    out
}
