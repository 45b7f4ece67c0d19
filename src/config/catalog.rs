//! Discovery and selection of configuration files in a directory.

use std::path::{Path, PathBuf};

use crate::error::{ReduceError, ReduceResult};

use super::GraphConfig;

/// The `*.json` configuration files of one directory, with a current selection.
///
/// The first file (sorted by path) is selected initially.
#[derive(Debug, Clone, Default)]
pub struct ConfigCatalog {
    dir: PathBuf,
    entries: Vec<(String, PathBuf)>,
    current: Option<usize>,
}

impl ConfigCatalog {
    /// Scan `dir` for `*.json` files.
    ///
    /// An empty directory yields an empty catalog rather than an error.
    pub fn discover(dir: impl AsRef<Path>) -> ReduceResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.to_string_lossy()));

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let entries: Vec<(String, PathBuf)> = paths
            .into_iter()
            .filter_map(|p| {
                let name = p.file_name()?.to_string_lossy().into_owned();
                Some((name, p))
            })
            .collect();
        let current = if entries.is_empty() { None } else { Some(0) };

        Ok(Self {
            dir,
            entries,
            current,
        })
    }

    /// Directory that was scanned.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of configuration files found.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no configuration file was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current selection (`0` when the catalog is empty).
    pub fn current_index(&self) -> usize {
        self.current.unwrap_or(0)
    }

    /// Path of the current selection.
    pub fn current_path(&self) -> Option<&Path> {
        self.current.map(|i| self.entries[i].1.as_path())
    }

    /// Select a configuration by file name.
    pub fn select(&mut self, name: &str) -> ReduceResult<()> {
        match self.entries.iter().position(|(n, _)| n == name) {
            Some(i) => {
                self.current = Some(i);
                Ok(())
            }
            None => Err(ReduceError::ConfigNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Load the current selection.
    pub fn load(&self) -> ReduceResult<GraphConfig> {
        match self.current_path() {
            Some(p) => GraphConfig::from_path(p),
            None => Err(ReduceError::ConfigNotFound {
                name: self.dir.join("*.json").display().to_string(),
            }),
        }
    }
}
