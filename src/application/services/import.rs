//! Record import service
//!
//! Reads `<data_dir>/<name>.<import_extension>` and builds a forest named
//! after the source from its tree records.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{parse_records, ApplicationResult, IoResultExt, RecordError};
use crate::config::Settings;
use crate::domain::Forest;
use crate::infrastructure::traits::FileSystem;

/// Output from importing a record file.
#[derive(Debug, Clone)]
pub struct ImportOutput {
    /// Forest named after the source, trees in file order
    pub forest: Forest,
    /// Lines that could not be parsed and were skipped
    pub rejected: Vec<RecordError>,
}

/// Service for reading forests from record files.
pub struct ImportService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ImportService {
    /// Create a new import service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Record file backing the forest `name`.
    pub fn source_path(&self, name: &str) -> PathBuf {
        self.settings.import_path(name)
    }

    /// Whether a record file exists for `name`.
    pub fn source_exists(&self, name: &str) -> bool {
        self.fs.is_file(&self.source_path(name))
    }

    /// Read the record file for `name` into a new forest.
    #[instrument(skip(self))]
    pub fn read_forest(&self, name: &str) -> ApplicationResult<ImportOutput> {
        let path = self.source_path(name);
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read forest records", &path)?;

        let (trees, rejected) = parse_records(&content);
        for r in &rejected {
            warn!("{}: skipping {}", path.display(), r);
        }
        debug!(
            "read_forest: {} trees, {} rejected from {}",
            trees.len(),
            rejected.len(),
            path.display()
        );

        Ok(ImportOutput {
            forest: Forest::with_trees(Some(name.to_string()), trees),
            rejected,
        })
    }
}
