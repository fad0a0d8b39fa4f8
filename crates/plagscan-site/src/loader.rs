//! Site definition loading from TOML files.

use crate::{
    definition::SiteDefinition,
    error::{Result, SiteError},
};
use plagscan_core::SiteId;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader for site definitions from TOML files.
pub struct SiteLoader {
    /// Base directory containing site definitions
    definitions_dir: PathBuf,
}

impl SiteLoader {
    /// Create a new loader with the given definitions directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(SiteError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Create a loader using the default definitions directory.
    ///
    /// Looks for `site-definitions/` relative to the workspace root.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        return Self::new(current_dir.join("site-definitions"));
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        Self::new(PathBuf::from("site-definitions"))
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Load a single site definition by ID.
    ///
    /// # Errors
    /// Returns error if the definition file doesn't exist, can't be read, or is invalid.
    pub fn load(&self, site_id: &SiteId) -> Result<SiteDefinition> {
        let filename = format!("{}.toml", site_id.as_str());

        let Some(path) = Self::find_file(&self.definitions_dir, &filename)? else {
            return Err(SiteError::NotFound {
                site_id: site_id.to_string(),
            });
        };

        let definition = Self::load_from_path(&path)?;
        definition.validate()?;

        if definition.id() != site_id {
            return Err(SiteError::ValidationError {
                site_id: site_id.to_string(),
                reason: format!(
                    "file {} declares site id '{}'",
                    path.display(),
                    definition.id()
                ),
            });
        }

        debug!(
            site_id = %site_id,
            name = %definition.name(),
            "loaded site definition"
        );

        Ok(definition)
    }

    /// Load all site definitions from the definitions directory.
    ///
    /// Invalid definitions are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<SiteDefinition>> {
        let mut definitions = Vec::new();

        Self::walk_and_load_recursive(&self.definitions_dir, &mut definitions)?;

        info!(
            count = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded site definitions"
        );

        Ok(definitions)
    }

    fn walk_and_load_recursive(dir: &Path, definitions: &mut Vec<SiteDefinition>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                Self::walk_and_load_recursive(&path, definitions)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match Self::load_from_path(&path) {
                    Ok(definition) => {
                        if let Err(e) = definition.validate() {
                            warn!(
                                path = %path.display(),
                                error = %e,
                                "skipping invalid site definition"
                            );
                            continue;
                        }
                        definitions.push(definition);
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to load site definition"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    fn find_file(dir: &Path, filename: &str) -> Result<Option<PathBuf>> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                if let Some(found) = Self::find_file(&path, filename)? {
                    return Ok(Some(found));
                }
            } else if path.file_name().and_then(|s| s.to_str()) == Some(filename) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    fn load_from_path(path: &Path) -> Result<SiteDefinition> {
        let contents = std::fs::read_to_string(path).map_err(|e| SiteError::LoadError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| SiteError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
