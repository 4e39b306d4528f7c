use crate::{Error, Result};
use estuary_core::PaletteMode;
use rand::Rng;
use rand::rngs::StdRng;

/// The fixed 85-color palette, ordered so that adjacent slots stay visually
/// distinct (the first dozen entries interleave the warm and cool anchors).
pub const PALETTE: [&str; 85] = [
    "#68a7d2", "#c356ff", "#e4b0ff", "#c1d7ec", "#cdd9e1", "#e0501c", "#f1ad8c", "#fa853f",
    "#fdc7a3", "#fca767", "#fdd7b7", "#fccc9c", "#8aea87", "#a8feab", "#c4fe9d", "#e0fd8e",
    "#fcfc7f", "#2f9969", "#52b785", "#8ad4ac", "#c0f1d3", "#23965d", "#43bb73", "#81d5a2",
    "#c1e7cd", "#4d982e", "#70b643", "#a2d370", "#c1e7cd", "#617c52", "#889f64", "#b0c277",
    "#d7e589", "#1b4242", "#5c8374", "#9ec8b9", "#b5e6d4", "#85656d", "#ac8c93", "#b8adaf",
    "#d1c5c6", "#a24f47", "#bd968f", "#eccab7", "#c9bcb9", "#8c85a9", "#b29ebc", "#d6b9d0",
    "#f8d6e5", "#91a3bb", "#a0c1d4", "#b4cfe2", "#dad8e5", "#3c79b4", "#78a3cc", "#b3cde4",
    "#eef7fc", "#3163eb", "#5882f8", "#84a1f9", "#adbffb", "#a97c26", "#d29c2f", "#f2be38",
    "#f5df7a", "#c65323", "#e96b3d", "#f9885e", "#fab590", "#d0241c", "#f54d40", "#f9877d",
    "#f7b3ac", "#d98777", "#e3a995", "#eccab7", "#f7ebdb", "#ae4ad9", "#d664f8", "#e48cf9",
    "#f0b5ff", "#ff007d", "#ff529a", "#ff7aad", "#ffa3c3",
];

/// Resolved color assignment for one render pass.
///
/// Each branch consumes two adjacent palette slots (rectangle, band) inside
/// the selected group; `Unit` collapses the group indexing to a single drawn
/// offset so every slot repeats one color. At most one random draw happens per
/// render pass, injected by the caller so seeded renders are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct PaletteAssignment {
    mode: PaletteMode,
    slots_per_group: usize,
    group: usize,
    unit_offset: usize,
}

impl PaletteAssignment {
    /// Selects a palette group (or the degenerate unit offset) for
    /// `branch_count` branches.
    ///
    /// Returns [`Error::DegeneratePalette`] when no full group of
    /// `2 * branch_count` slots fits in the palette; the group roll is bounded
    /// to the covered prefix, never an unbounded redraw.
    pub fn resolve(branch_count: usize, mode: PaletteMode, rng: &mut StdRng) -> Result<Self> {
        if branch_count == 0 {
            // Degenerate render: only the source rectangle is drawn.
            return Ok(Self {
                mode,
                slots_per_group: 0,
                group: 0,
                unit_offset: 0,
            });
        }

        let slots_per_group = 2 * branch_count;
        let group_count = PALETTE.len() / slots_per_group;
        if group_count == 0 {
            return Err(Error::DegeneratePalette { branch_count });
        }

        let assignment = match mode {
            PaletteMode::Regular => Self {
                mode,
                slots_per_group,
                group: 0,
                unit_offset: 0,
            },
            PaletteMode::Random => {
                let mut roll = rng.random_range(1..=PALETTE.len());
                while roll > group_count * slots_per_group {
                    roll = rng.random_range(1..=PALETTE.len());
                }
                Self {
                    mode,
                    slots_per_group,
                    group: (roll - 1) / slots_per_group,
                    unit_offset: 0,
                }
            }
            PaletteMode::Unit => Self {
                mode,
                slots_per_group,
                group: 0,
                unit_offset: rng.random_range(1..PALETTE.len()),
            },
        };
        tracing::debug!(
            ?mode,
            slots_per_group,
            group = assignment.group,
            "resolved palette"
        );
        Ok(assignment)
    }

    /// The source rectangle always takes the first palette entry.
    pub fn source(&self) -> &'static str {
        PALETTE[0]
    }

    /// Rectangle color for branch `i` (1-based display position).
    pub fn rect(&self, i: usize) -> &'static str {
        match self.mode {
            PaletteMode::Unit => PALETTE[self.unit_offset],
            _ => PALETTE[2 * i - 1 + self.slots_per_group * self.group],
        }
    }

    /// Band color for branch `i` (1-based display position).
    pub fn band(&self, i: usize) -> &'static str {
        match self.mode {
            PaletteMode::Unit => PALETTE[self.unit_offset],
            _ => PALETTE[2 * i + self.slots_per_group * self.group],
        }
    }

    pub fn group(&self) -> usize {
        self.group
    }
}
