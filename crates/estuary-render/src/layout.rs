use crate::model::{
    BandLayout, BranchLayout, DiagramLayout, DividerLayout, LabelLayout, RectLayout, SourceLayout,
};
use estuary_core::FlowDataset;

/// Empirical aspect constant converting magnitude units to pixels. Changing
/// it rescales every diagram, so it is part of the visual contract.
pub const ASPECT_RATIO: f64 = 5000.0 / 2025.0;

/// Labels render at a fixed bold 20px (the diagram never measures text to
/// place them; they are edge-anchored).
pub const LABEL_FONT_SIZE: f64 = 20.0;

/// Computes the complete geometry for one dataset at one canvas size.
///
/// Pure: the dataset is read-only and the returned layout owns all of its
/// values, so resize handling is simply calling this again with the new
/// dimensions and dropping the old geometry.
///
/// The vertical anchor is the median branch — the first branch whose
/// cumulative magnitude reaches half the total. The diagram is built outward
/// from it, which keeps the picture vertically balanced regardless of
/// branch-size skew. Branch rectangles are separated by `gap`; the source
/// rectangle is one contiguous block with no gaps between its sub-segments.
pub fn compute_layout(dataset: &FlowDataset, width: f64, height: f64) -> DiagramLayout {
    let total = dataset.source_value();
    let branch_count = dataset.branch_count();

    let node_width = width / 32.0;
    let source_x = width / 16.0 * 5.0;
    let branch_x = width / 64.0 * 45.0;
    let source_label_x = width / 64.0 * 19.0;
    let branch_label_x = width / 64.0 * 43.0;

    let scale = total as f64 / height * ASPECT_RATIO;
    let px = |value: u64| -> f64 {
        if scale > 0.0 { value as f64 / scale } else { 0.0 }
    };

    let gap = if branch_count <= 1 || scale == 0.0 {
        0.0
    } else {
        total as f64 / (branch_count as f64 - 1.0) / scale
    };

    // Median branch by cumulative magnitude: the first branch whose running
    // sum reaches half the total.
    let mut median_index = 0;
    let mut median_height = 0.0;
    let mut sum: u64 = 0;
    for (i, (_, value)) in dataset.branches().enumerate() {
        sum += value;
        if sum >= total / 2 {
            median_index = i + 1;
            median_height = px(value);
            break;
        }
    }

    let branch_heights: Vec<f64> = dataset.branches().map(|(_, v)| px(v)).collect();

    // Walk backward from the vertical center over the pre-median branches.
    // The source side stacks without gaps; the branch side inserts one gap per
    // preceding branch.
    let mut source_y = height / 2.0 - median_height / 2.0;
    let mut branch_start_y = source_y;
    for h in &branch_heights[..median_index.saturating_sub(1)] {
        source_y -= h;
        branch_start_y -= h + gap;
    }
    if branch_count == 0 {
        // Only the source entry: center its rectangle, draw nothing else.
        source_y = height / 2.0 - px(total) / 2.0;
    }

    let source_thickness = px(total);
    let source = SourceLayout {
        name: dataset.source_name().to_string(),
        value: total,
        rect: RectLayout {
            x: source_x,
            y: source_y,
            width: node_width,
            height: (source_thickness - 1.0).max(0.0),
        },
        thickness: source_thickness,
        label: LabelLayout {
            text: format!("{}: {}", dataset.source_name(), total),
            right_x: source_label_x,
            center_y: source_y + source_thickness / 2.0,
            font_size: LABEL_FONT_SIZE,
        },
    };

    let band_start_x = source_x + node_width;
    let mut branches = Vec::with_capacity(branch_count);
    let mut dividers = Vec::new();
    let mut band_source_top = source_y;
    let mut y = branch_start_y;

    for (i, (name, value)) in dataset.branches().enumerate() {
        let index = i + 1;
        let thickness = branch_heights[i];

        if index > 1 {
            dividers.push(DividerLayout {
                x1: branch_x,
                y1: y,
                x2: branch_x + node_width,
                y2: y,
            });
        }

        branches.push(BranchLayout {
            name: name.to_string(),
            value,
            index,
            rect: RectLayout {
                x: branch_x,
                y,
                width: node_width,
                height: (thickness - 1.0).max(0.0),
            },
            thickness,
            band: BandLayout {
                start_x: band_start_x,
                end_x: branch_x,
                source_top: band_source_top,
                branch_top: y,
                thickness,
            },
            label: LabelLayout {
                text: format!("{name}: {value}"),
                right_x: branch_label_x,
                center_y: y + thickness / 2.0,
                font_size: LABEL_FONT_SIZE,
            },
        });

        band_source_top += thickness;
        y += thickness;
        if index < branch_count {
            dividers.push(DividerLayout {
                x1: branch_x,
                y1: y,
                x2: branch_x + node_width,
                y2: y,
            });
        }
        y += gap;
    }

    tracing::debug!(
        width,
        height,
        scale,
        gap,
        median_index,
        branches = branch_count,
        "computed diagram layout"
    );

    DiagramLayout {
        width,
        height,
        scale,
        gap,
        node_width,
        source,
        branches,
        dividers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estuary_core::FlowDataset;

    fn energy() -> FlowDataset {
        FlowDataset::parse("Energy\nTotal\nSolar 100\nWind 100\nCoal 100\n").unwrap()
    }

    #[test]
    fn equal_branches_split_the_source_thickness_in_thirds() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        assert_eq!(layout.branches.len(), 3);
        for b in &layout.branches {
            assert!((b.thickness - layout.source.thickness / 3.0).abs() < 1e-9);
        }
        assert!(layout.gap > 0.0);
    }

    #[test]
    fn gaps_separate_adjacent_branch_rects_exactly() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        for pair in layout.branches.windows(2) {
            let bottom = pair[0].band.branch_top + pair[0].thickness;
            let top = pair[1].band.branch_top;
            assert!((top - bottom - layout.gap).abs() < 1e-9);
        }
    }

    #[test]
    fn source_side_band_offsets_stack_without_gaps() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        let mut expected = layout.source.rect.y;
        for b in &layout.branches {
            assert!((b.band.source_top - expected).abs() < 1e-9);
            expected += b.thickness;
        }
        // The band stack covers the source rectangle exactly.
        assert!((expected - layout.source.rect.y - layout.source.thickness).abs() < 1e-9);
    }

    #[test]
    fn branch_thicknesses_conserve_the_source_thickness() {
        let ds = FlowDataset::parse("T\nAll\nA 37\nB 11\nC 52\nD 100\n").unwrap();
        let layout = compute_layout(&ds, 800.0, 450.0);
        let branch_sum: f64 = layout.branches.iter().map(|b| b.thickness).sum();
        assert!((branch_sum - layout.source.thickness).abs() < 1e-9);
        // The gap budget equals the source thickness spread over the
        // inter-branch slots.
        let slots = layout.branches.len() as f64 - 1.0;
        assert!((slots * layout.gap - layout.source.thickness).abs() < 1e-9);
    }

    #[test]
    fn single_branch_has_no_gap_and_full_thickness() {
        let ds = FlowDataset::parse("T\nAll\nOnly 250\n").unwrap();
        let layout = compute_layout(&ds, 600.0, 500.0);
        assert_eq!(layout.gap, 0.0);
        assert_eq!(layout.branches.len(), 1);
        assert_eq!(layout.dividers.len(), 0);
        assert!((layout.branches[0].thickness - layout.source.thickness).abs() < 1e-9);
    }

    #[test]
    fn dividers_mark_both_edges_of_every_gap() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        // Three branches, two gaps, two edges each.
        assert_eq!(layout.dividers.len(), 4);
        for d in &layout.dividers {
            assert_eq!(d.y1, d.y2);
            assert!((d.x2 - d.x1 - layout.node_width).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_branch_dataset_renders_the_source_alone() {
        let ds = FlowDataset::parse("T\nAll\n").unwrap();
        let layout = compute_layout(&ds, 600.0, 500.0);
        assert!(layout.branches.is_empty());
        assert!(layout.dividers.is_empty());
        assert_eq!(layout.gap, 0.0);
        assert_eq!(layout.source.thickness, 0.0);
        for v in [
            layout.source.rect.x,
            layout.source.rect.y,
            layout.source.rect.height,
        ] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn scale_follows_the_aspect_constant() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        assert!((layout.scale - 300.0 / 500.0 * ASPECT_RATIO).abs() < 1e-12);
    }

    #[test]
    fn median_branch_straddles_the_vertical_center() {
        // One dominant branch: the layout centers on it, not on branch 0.
        let ds = FlowDataset::parse("T\nAll\nTiny 1\nHuge 98\nSmall 1\n").unwrap();
        let layout = compute_layout(&ds, 600.0, 500.0);
        let huge = &layout.branches[1];
        let center = huge.rect.y + huge.thickness / 2.0;
        assert!((center - 250.0).abs() < 1e-9);
    }

    #[test]
    fn resize_recomputes_without_touching_the_dataset() {
        let ds = energy();
        let before = ds.clone();
        let a = compute_layout(&ds, 600.0, 500.0);
        let b = compute_layout(&ds, 1200.0, 900.0);
        assert_eq!(ds.order, before.order);
        assert_eq!(ds.totals, before.totals);
        assert!((a.scale - b.scale).abs() > 1e-9);
        assert!((b.node_width - 1200.0 / 32.0).abs() < 1e-9);
    }

    #[test]
    fn band_control_points_sit_at_quarter_spans() {
        let layout = compute_layout(&energy(), 600.0, 500.0);
        let band = &layout.branches[0].band;
        let span = band.end_x - band.start_x;
        assert!((band.control1_x() - (band.start_x + span / 4.0)).abs() < 1e-9);
        assert!((band.control2_x() - (band.end_x - span / 4.0)).abs() < 1e-9);
    }
}
