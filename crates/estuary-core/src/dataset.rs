use crate::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

/// A single-source flow dataset: one total split across named branches.
///
/// `order[0]` is the source key and `order[1..]` are the branch keys in display
/// order. `totals` holds one magnitude per key; the source magnitude is derived
/// by the loader as the sum of the branch magnitudes, never read from the file.
/// A dataset is immutable once loaded — every render recomputes geometry from
/// the same values.
#[derive(Debug, Clone, Serialize)]
pub struct FlowDataset {
    pub title: String,
    pub totals: IndexMap<String, u64>,
    pub order: Vec<String>,
}

impl FlowDataset {
    /// Loads a dataset file.
    ///
    /// A missing file is reported as [`Error::DatasetNotFound`]; other I/O
    /// failures surface as [`Error::Io`].
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DatasetNotFound {
                name: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parses the flat dataset format:
    ///
    /// ```text
    /// line 1: <diagram title>
    /// line 2: <source entry name>
    /// line 3..: <branch name> <integer magnitude>
    /// ```
    ///
    /// Branch names may contain embedded spaces; the magnitude is the last
    /// space-separated token on the line. A file with no branch lines is a
    /// valid (degenerate) dataset.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();

        let title = lines
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::MalformedDataset {
                line: 1,
                message: "expected a title line".to_string(),
            })?
            .to_string();

        let source_name = lines
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::MalformedDataset {
                line: 2,
                message: "expected a source entry name".to_string(),
            })?
            .to_string();

        let mut totals: IndexMap<String, u64> = IndexMap::new();
        let mut order = vec![source_name.clone()];
        let mut sum: u64 = 0;

        for (idx, raw) in lines.enumerate() {
            let line_no = idx + 3;
            let line = raw.trim();
            let (name, value_token) =
                line.rsplit_once(' ')
                    .ok_or_else(|| Error::MalformedDataset {
                        line: line_no,
                        message: "expected a branch name followed by a magnitude".to_string(),
                    })?;
            let name = name.trim_end();
            if name.is_empty() {
                return Err(Error::MalformedDataset {
                    line: line_no,
                    message: "empty branch name".to_string(),
                });
            }
            let value = value_token
                .parse::<u64>()
                .map_err(|_| Error::MalformedDataset {
                    line: line_no,
                    message: format!("invalid magnitude {value_token:?}"),
                })?;
            if totals.insert(name.to_string(), value).is_some() {
                return Err(Error::MalformedDataset {
                    line: line_no,
                    message: format!("duplicate branch name {name:?}"),
                });
            }
            order.push(name.to_string());
            sum = sum.checked_add(value).ok_or_else(|| Error::MalformedDataset {
                line: line_no,
                message: "branch magnitudes overflow the total".to_string(),
            })?;
        }

        if totals.insert(source_name.clone(), sum).is_some() {
            return Err(Error::MalformedDataset {
                line: 2,
                message: format!("branch name duplicates the source entry {source_name:?}"),
            });
        }

        let dataset = Self {
            title,
            totals,
            order,
        };
        tracing::debug!(
            title = %dataset.title,
            branches = dataset.branch_count(),
            total = dataset.source_value(),
            "loaded flow dataset"
        );
        Ok(dataset)
    }

    pub fn source_name(&self) -> &str {
        &self.order[0]
    }

    /// The derived total magnitude (sum of all branch magnitudes).
    pub fn source_value(&self) -> u64 {
        self.totals.get(self.source_name()).copied().unwrap_or(0)
    }

    pub fn branch_count(&self) -> usize {
        self.order.len() - 1
    }

    /// Branches in display order.
    pub fn branches(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order[1..].iter().map(|name| {
            (
                name.as_str(),
                self.totals.get(name).copied().unwrap_or(0),
            )
        })
    }
}
