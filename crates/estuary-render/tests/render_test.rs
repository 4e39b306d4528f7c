use estuary_core::{FlowDataset, PaletteMode};
use estuary_render::model::Primitive;
use estuary_render::palette::PALETTE;
use estuary_render::svg::SvgRenderOptions;
use estuary_render::{RenderOptions, render_diagram, render_diagram_svg};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> FlowDataset {
    let path = workspace_root().join("fixtures").join(name);
    FlowDataset::from_path(&path).expect("fixture")
}

#[test]
fn energy_regular_emits_the_full_primitive_set() {
    let dataset = fixture("energy.txt");
    let primitives = render_diagram(
        &dataset,
        PaletteMode::Regular,
        600.0,
        500.0,
        &RenderOptions::default(),
    )
    .expect("render ok");

    let mut rects = 0;
    let mut lines = 0;
    let mut bands = 0;
    let mut texts = 0;
    for p in &primitives {
        match p {
            Primitive::Rect { .. } => rects += 1,
            Primitive::Line { .. } => lines += 1,
            Primitive::Band { .. } => bands += 1,
            Primitive::Text { .. } => texts += 1,
        }
    }
    // 3 branch rects + 1 source rect, 2 gaps with 2 divider edges each,
    // one band and one label per branch plus the source label.
    assert_eq!(rects, 4);
    assert_eq!(lines, 4);
    assert_eq!(bands, 3);
    assert_eq!(texts, 4);
}

#[test]
fn regular_mode_walks_group_zero_in_order() {
    let dataset = fixture("energy.txt");
    let primitives = render_diagram(
        &dataset,
        PaletteMode::Regular,
        600.0,
        500.0,
        &RenderOptions::default(),
    )
    .expect("render ok");

    let rect_fills: Vec<&str> = primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Rect { fill, .. } => Some(fill.as_str()),
            _ => None,
        })
        .collect();
    // Branch rects use odd group-0 slots; the source rect closes with the
    // palette anchor color.
    assert_eq!(rect_fills, vec![PALETTE[1], PALETTE[3], PALETTE[5], PALETTE[0]]);

    let band_fills: Vec<&str> = primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Band { fill, .. } => Some(fill.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(band_fills, vec![PALETTE[2], PALETTE[4], PALETTE[6]]);
}

#[test]
fn regular_mode_is_deterministic_across_calls() {
    let dataset = fixture("budget.txt");
    let options = RenderOptions::default();
    let svg_options = SvgRenderOptions::default();
    let a = render_diagram_svg(&dataset, PaletteMode::Regular, 600.0, 500.0, &options, &svg_options)
        .expect("render ok");
    let b = render_diagram_svg(&dataset, PaletteMode::Regular, 600.0, 500.0, &options, &svg_options)
        .expect("render ok");
    assert_eq!(a, b);
}

#[test]
fn seeded_random_renders_are_reproducible() {
    let dataset = fixture("budget.txt");
    let options = RenderOptions {
        palette_seed: Some(1234),
    };
    let svg_options = SvgRenderOptions::default();
    let a = render_diagram_svg(&dataset, PaletteMode::Random, 600.0, 500.0, &options, &svg_options)
        .expect("render ok");
    let b = render_diagram_svg(&dataset, PaletteMode::Random, 600.0, 500.0, &options, &svg_options)
        .expect("render ok");
    assert_eq!(a, b);
}

#[test]
fn unit_mode_fills_every_branch_with_one_color() {
    let dataset = fixture("energy.txt");
    let primitives = render_diagram(
        &dataset,
        PaletteMode::Unit,
        600.0,
        500.0,
        &RenderOptions {
            palette_seed: Some(7),
        },
    )
    .expect("render ok");

    let mut branch_fills: Vec<&str> = Vec::new();
    for p in &primitives {
        if let Primitive::Band { fill, .. } = p {
            branch_fills.push(fill);
        }
    }
    assert!(!branch_fills.is_empty());
    assert!(branch_fills.iter().all(|f| *f == branch_fills[0]));
}

#[test]
fn single_branch_renders_one_band_and_no_dividers() {
    let dataset = fixture("single.txt");
    let primitives = render_diagram(
        &dataset,
        PaletteMode::Regular,
        600.0,
        500.0,
        &RenderOptions::default(),
    )
    .expect("render ok");

    let bands = primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Band { .. }))
        .count();
    let lines = primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Line { .. }))
        .count();
    assert_eq!(bands, 1);
    assert_eq!(lines, 0);
}

#[test]
fn zero_branch_dataset_renders_source_rect_and_label_only() {
    let dataset = FlowDataset::parse("Empty\nTotal\n").expect("parse ok");
    let primitives = render_diagram(
        &dataset,
        PaletteMode::Random,
        600.0,
        500.0,
        &RenderOptions::default(),
    )
    .expect("render ok");
    assert_eq!(primitives.len(), 2);
    assert!(matches!(primitives[0], Primitive::Rect { .. }));
    assert!(matches!(primitives[1], Primitive::Text { .. }));
}

#[test]
fn too_many_branches_surface_a_degenerate_palette_error() {
    let mut text = String::from("Wide\nTotal\n");
    for i in 0..43 {
        text.push_str(&format!("Branch {i} 10\n"));
    }
    let dataset = FlowDataset::parse(&text).expect("parse ok");
    let err = render_diagram(
        &dataset,
        PaletteMode::Random,
        600.0,
        500.0,
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        estuary_render::Error::DegeneratePalette { branch_count: 43 }
    ));
}

#[test]
fn layout_serializes_for_geometry_dumps() {
    let dataset = fixture("energy.txt");
    let layout = estuary_render::layout::compute_layout(&dataset, 600.0, 500.0);
    let value = serde_json::to_value(&layout).expect("serialize ok");
    assert_eq!(value["width"], 600.0);
    assert_eq!(value["branches"].as_array().unwrap().len(), 3);
    assert!(value["source"]["rect"]["height"].is_number());
    assert!(value["branches"][0]["band"]["thickness"].is_number());
}

#[test]
fn svg_document_contains_rects_bands_and_labels() {
    let dataset = fixture("energy.txt");
    let svg = render_diagram_svg(
        &dataset,
        PaletteMode::Regular,
        600.0,
        500.0,
        &RenderOptions::default(),
        &SvgRenderOptions {
            diagram_id: Some("energy".to_string()),
            title: Some(dataset.title.clone()),
            background: Some("white".to_string()),
        },
    )
    .expect("render ok");

    assert!(svg.starts_with(r#"<svg id="energy""#));
    assert!(svg.contains("<title>Energy Production</title>"));
    assert!(svg.contains("Total: 300"));
    assert!(svg.contains("Solar: 100"));
    assert!(svg.matches("<rect").count() == 4);
    assert!(svg.matches("<path").count() == 3);
    assert!(svg.ends_with("</svg>"));
}
