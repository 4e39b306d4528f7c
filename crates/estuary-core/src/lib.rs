#![forbid(unsafe_code)]

//! Flow dataset model + flat-file loader (headless).
//!
//! Design goals:
//! - a loaded [`FlowDataset`] is immutable; geometry is always derived downstream
//! - loading failures are values, never process exits
//! - deterministic, testable outputs (no I/O outside [`dataset::FlowDataset::from_path`]
//!   and [`discover`])

pub mod dataset;
pub mod discover;
pub mod error;
pub mod mode;

pub use dataset::FlowDataset;
pub use error::{Error, Result};
pub use mode::PaletteMode;
