//! Raw file resources with optional placeholder substitution.
//!
//! Locates a file by `(application, profile, label, path)` coordinates and,
//! for text retrieval, substitutes `${key}` placeholders from the flattened
//! environment assembled for the same coordinates.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::environment::{flatten, resolve_placeholders};
use crate::error::{ConfigError, Result};
use crate::server::AssemblyEngine;

/// Trait for locating raw file resources.
///
/// Implementations decide how coordinates map onto storage (a working-copy
/// checkout, a directory tree, an object store). Only the contract is
/// consumed here.
pub trait ResourceRepository: Send + Sync {
    /// Find the file for the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ResourceNotFound`] when no file matches.
    fn find(
        &self,
        application: &str,
        profile: &str,
        label: Option<&str>,
        path: &str,
    ) -> Result<PathBuf>;
}

/// Directory-backed resource repository.
///
/// Searches, in order: `{application}-{profile}/{path}`, `{application}/{path}`,
/// then `{path}`, each under `{root}/{label}` when a label is given and under
/// `{root}` otherwise. The first existing file wins.
pub struct FileResourceRepository {
    root: PathBuf,
}

impl FileResourceRepository {
    /// Create a repository rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(
        &self,
        application: &str,
        profile: &str,
        label: Option<&str>,
        path: &str,
    ) -> Vec<PathBuf> {
        let base = match label {
            Some(label) => self.root.join(label),
            None => self.root.clone(),
        };
        vec![
            base.join(format!("{application}-{profile}")).join(path),
            base.join(application).join(path),
            base.join(path),
        ]
    }
}

impl ResourceRepository for FileResourceRepository {
    fn find(
        &self,
        application: &str,
        profile: &str,
        label: Option<&str>,
        path: &str,
    ) -> Result<PathBuf> {
        for candidate in self.candidates(application, profile, label, path) {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "located resource");
                return Ok(candidate);
            }
        }
        Err(ConfigError::ResourceNotFound(format!(
            "{application}/{profile}/{}/{path}",
            label.unwrap_or("")
        )))
    }
}

/// Retrieve a text resource, optionally substituting `${key}` placeholders
/// from the environment assembled for the same coordinates.
///
/// # Errors
///
/// Fails when the resource does not exist, cannot be read as UTF-8, or
/// (with `resolve` set) when the environment resolution itself fails.
pub fn retrieve_resource(
    repository: &dyn ResourceRepository,
    engine: &AssemblyEngine,
    application: &str,
    profile: &str,
    label: Option<&str>,
    path: &str,
    resolve: bool,
) -> Result<String> {
    let file = repository.find(application, profile, label, path)?;
    let text = read_utf8(&file)?;
    if !resolve {
        return Ok(text);
    }
    let environment = engine.resolve(application, profile, label.unwrap_or(""))?;
    let values = flatten(&environment);
    Ok(resolve_placeholders(&values, &text))
}

/// Retrieve a binary resource verbatim. No placeholder substitution.
pub fn retrieve_binary(
    repository: &dyn ResourceRepository,
    application: &str,
    profile: &str,
    label: Option<&str>,
    path: &str,
) -> Result<Vec<u8>> {
    let file = repository.find(application, profile, label, path)?;
    Ok(fs::read(file)?)
}

fn read_utf8(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}
