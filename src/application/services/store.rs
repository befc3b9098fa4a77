//! Forest persistence service
//!
//! A forest is stored whole, keyed by its name, in
//! `<data_dir>/<name>.<store_extension>`. The file is TOML with this layout:
//!
//! ```text
//! name = "Montane"
//!
//! [[trees]]              # one table per tree, in tree-number order
//! species = "Maple"      # Unknown | Maple | Birch | Fir
//! year_planting = 2010
//! height = 12.5          # feet, full precision
//! growth_rate = 15.0     # percent per year, full precision
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Forest, Species, Tree};
use crate::infrastructure::traits::FileSystem;

/// Suffix of the temporary file a save is written to before it replaces the target.
const PARTIAL_SUFFIX: &str = "partial";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
enum SpeciesRecord {
    Unknown,
    Maple,
    Birch,
    Fir,
}

impl From<Species> for SpeciesRecord {
    fn from(species: Species) -> Self {
        match species {
            Species::Unknown => SpeciesRecord::Unknown,
            Species::Maple => SpeciesRecord::Maple,
            Species::Birch => SpeciesRecord::Birch,
            Species::Fir => SpeciesRecord::Fir,
        }
    }
}

impl From<SpeciesRecord> for Species {
    fn from(record: SpeciesRecord) -> Self {
        match record {
            SpeciesRecord::Unknown => Species::Unknown,
            SpeciesRecord::Maple => Species::Maple,
            SpeciesRecord::Birch => Species::Birch,
            SpeciesRecord::Fir => Species::Fir,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct TreeRecord {
    species: SpeciesRecord,
    year_planting: i32,
    height: f64,
    growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ForestRecord {
    name: String,
    #[serde(default)]
    trees: Vec<TreeRecord>,
}

impl From<&Tree> for TreeRecord {
    fn from(tree: &Tree) -> Self {
        Self {
            species: tree.species.into(),
            year_planting: tree.year_planting,
            height: tree.height,
            growth_rate: tree.growth_rate,
        }
    }
}

impl From<TreeRecord> for Tree {
    fn from(record: TreeRecord) -> Self {
        Tree::new(
            record.species.into(),
            record.year_planting,
            record.height,
            record.growth_rate,
        )
    }
}

/// Saves and restores whole forests.
pub struct ForestStore {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ForestStore {
    /// Create a new forest store.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// File the forest `name` is stored in.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.settings.store_path(name)
    }

    /// Persist `forest` under its own name.
    ///
    /// The content goes to a temporary sibling first and is renamed over the
    /// target, so an existing save is either fully replaced or left as it was.
    /// Returns the path written.
    #[instrument(skip(self, forest), fields(name = ?forest.name()))]
    pub fn save(&self, forest: &Forest) -> ApplicationResult<PathBuf> {
        let name = forest.name().ok_or(ApplicationError::UnnamedForest)?;
        check_name(name)?;
        let path = self.path_for(name);

        let record = ForestRecord {
            name: name.to_string(),
            trees: forest.trees().iter().map(TreeRecord::from).collect(),
        };
        let content = toml::to_string_pretty(&record).map_err(|e| {
            ApplicationError::OperationFailed {
                context: format!("serialize forest {}", name),
                source: Box::new(e),
            }
        })?;

        self.fs
            .ensure_parent(&path)
            .with_path_context("create data directory for", &path)?;
        let partial = partial_path(&path);
        if let Err(e) = self.fs.write(&partial, &content) {
            self.discard_partial(&partial);
            return Err::<PathBuf, _>(e).with_path_context("write forest", &partial);
        }
        if let Err(e) = self.fs.rename(&partial, &path) {
            self.discard_partial(&partial);
            return Err::<PathBuf, _>(e).with_path_context("replace forest", &path);
        }

        debug!("save: {} trees to {}", forest.len(), path.display());
        Ok(path)
    }

    /// Restore the forest saved under `name`.
    ///
    /// Either the whole forest is returned or an error; never a partial one.
    #[instrument(skip(self))]
    pub fn load(&self, name: &str) -> ApplicationResult<Forest> {
        check_name(name)?;
        let path = self.path_for(name);
        if !self.fs.is_file(&path) {
            return Err(ApplicationError::ForestNotFound(path));
        }

        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| corrupt(&path, e))?;
        let record: ForestRecord = toml::from_str(&content).map_err(|e| corrupt(&path, e))?;

        let trees: Vec<Tree> = record.trees.into_iter().map(Tree::from).collect();
        debug!("load: {} trees from {}", trees.len(), path.display());
        Ok(Forest::with_trees(Some(record.name), trees))
    }

    fn discard_partial(&self, partial: &Path) {
        if !self.fs.exists(partial) {
            return;
        }
        if let Err(e) = self.fs.remove_file(partial) {
            warn!("could not remove {}: {}", partial.display(), e);
        }
    }
}

/// Forest names become file names inside `data_dir`; anything that could
/// name another directory is refused.
fn check_name(name: &str) -> ApplicationResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if bad {
        return Err(ApplicationError::InvalidForestName(name.to_string()));
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

fn corrupt(path: &Path, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::CorruptForest {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
