//! Dataset discovery: directory scan + id resolution + fuzzy suggestion.
//!
//! Dataset ids are the file stems of `*.txt` files in a directory. The
//! suggestion helper is a cosmetic convenience for frontends; nothing in the
//! layout pipeline depends on it.

use crate::{Error, Result};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::path::{Path, PathBuf};

/// Lists dataset ids (file stems of `*.txt` files) in `dir`, sorted.
pub fn list_datasets(dir: &Path) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Strips a trailing `.txt` typed by the user.
pub fn normalize_id(raw: &str) -> &str {
    raw.strip_suffix(".txt").unwrap_or(raw)
}

/// Resolves a dataset argument: an existing path wins, otherwise the id is
/// looked up as `<dir>/<id>.txt`.
pub fn resolve(dir: &Path, raw: &str) -> Result<PathBuf> {
    let as_path = Path::new(raw);
    if as_path.is_file() {
        return Ok(as_path.to_path_buf());
    }
    let id = normalize_id(raw);
    let candidate = dir.join(format!("{id}.txt"));
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(Error::DatasetNotFound {
        name: id.to_string(),
    })
}

/// Best fuzzy match for `input` among `known` ids, if any scores at all.
pub fn suggest<'a>(input: &str, known: &'a [String]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    known
        .iter()
        .filter_map(|id| matcher.fuzzy_match(id, input).map(|score| (score, id)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, id)| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("energy.txt"), "Energy\nTotal\nSolar 1\n").unwrap();
        std::fs::write(dir.path().join("budget.txt"), "Budget\nTotal\nRoads 2\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a dataset").unwrap();
        dir
    }

    #[test]
    fn lists_txt_stems_sorted() {
        let dir = seeded_dir();
        let ids = list_datasets(dir.path()).unwrap();
        assert_eq!(ids, vec!["budget", "energy"]);
    }

    #[test]
    fn resolves_id_with_or_without_txt_suffix() {
        let dir = seeded_dir();
        let a = resolve(dir.path(), "energy").unwrap();
        let b = resolve(dir.path(), "energy.txt").unwrap();
        assert_eq!(a, b);
        assert!(a.ends_with("energy.txt"));
    }

    #[test]
    fn unknown_id_is_dataset_not_found() {
        let dir = seeded_dir();
        let err = resolve(dir.path(), "engery").unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound { name } if name == "engery"));
    }

    #[test]
    fn suggest_offers_the_closest_id() {
        let known = vec!["budget".to_string(), "energy".to_string()];
        assert_eq!(suggest("enrgy", &known), Some("energy"));
        assert_eq!(suggest("budg", &known), Some("budget"));
    }
}
