//! Artifact loading: feature schema file and optional integrity manifest.
//!
//! # Manifest
//!
//! A `manifest.json` next to the model artifact binds files by SHA-256:
//!
//! ```json
//! { "version": 1, "files": { "heart_disease_model.json": "<hex>", "model_features.json": "<hex>" } }
//! ```
//!
//! When present, it must bind every artifact loaded from that directory and
//! every bound file must hash to its recorded digest. `hash_artifacts` writes it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::logistic::LogisticClassifier;
use crate::domain::{FeatureSchema, ModelError};

/// File name of the integrity manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

/// Integrity manifest: relative file name -> SHA-256 hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ModelError> {
    fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ArtifactManifest {
    /// Hash the given files (relative to `dir`) into a new manifest.
    ///
    /// # Errors
    /// Returns `ModelError::Io` if any file cannot be read.
    pub fn for_files<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<Self, ModelError> {
        let mut files = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let bytes = read_bytes(&dir.join(name))?;
            files.insert(name.to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }

    /// Read `manifest.json` from a directory, if there is one.
    ///
    /// # Errors
    /// Returns error if the manifest exists but cannot be read or parsed.
    pub fn read_from(dir: &Path) -> Result<Option<Self>, ModelError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = read_bytes(&path)?;
        let manifest: Self =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse { path, source })?;
        Ok(Some(manifest))
    }

    /// Check that `required` files are bound and that every bound file matches.
    ///
    /// # Errors
    /// Returns `ModelError::Integrity` on any unbound file or digest mismatch.
    pub fn verify(&self, dir: &Path, required: &[&str]) -> Result<(), ModelError> {
        if self.version != MANIFEST_VERSION {
            return Err(ModelError::Integrity(format!(
                "unsupported manifest version {}",
                self.version
            )));
        }

        for name in required {
            if !self.files.contains_key(*name) {
                return Err(ModelError::Integrity(format!(
                    "{MANIFEST_FILE} does not bind {name}"
                )));
            }
        }

        for (rel, expected) in &self.files {
            let actual = sha256_hex(&read_bytes(&dir.join(rel))?);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(ModelError::Integrity(format!("File hash mismatch for {rel}")));
            }
        }

        Ok(())
    }
}

/// Load the ordered feature names (a JSON array of strings).
///
/// # Errors
/// Returns error if the file is unreadable, not a string array, or does not
/// resolve to the thirteen known features.
pub fn load_feature_schema(path: &Path) -> Result<FeatureSchema, ModelError> {
    let bytes = read_bytes(path)?;
    let names: Vec<String> = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = FeatureSchema::from_names(names.as_slice())?;
    tracing::info!("Loaded feature schema from {:?} ({} columns)", path, schema.len());
    Ok(schema)
}

/// Where to find the artifacts and how strictly to check them.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub features: PathBuf,
    pub require_manifest: bool,
}

/// Split a path into (directory, file name).
fn dir_and_name(path: &Path) -> Result<(&Path, &str), ModelError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ModelError::Integrity(format!("{path:?} has no file name")))?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok((dir, name))
}

/// Verify artifacts against the manifest in the model's directory.
///
/// Returns `true` if a manifest was found and verified.
///
/// # Errors
/// Returns `ModelError::Integrity` if verification fails, or if
/// `require_manifest` is set and no manifest exists.
pub fn verify_artifacts(paths: &ArtifactPaths) -> Result<bool, ModelError> {
    let (model_dir, model_name) = dir_and_name(&paths.model)?;
    let (features_dir, features_name) = dir_and_name(&paths.features)?;

    let Some(manifest) = ArtifactManifest::read_from(model_dir)? else {
        if paths.require_manifest {
            return Err(ModelError::Integrity(format!(
                "{MANIFEST_FILE} required but not found in {model_dir:?}"
            )));
        }
        tracing::warn!("No {MANIFEST_FILE} in {:?}; loading unverified artifacts", model_dir);
        return Ok(false);
    };

    if features_dir != model_dir {
        return Err(ModelError::Integrity(format!(
            "feature schema {:?} is outside the manifest directory {:?}",
            paths.features, model_dir
        )));
    }

    manifest.verify(model_dir, &[model_name, features_name])?;
    tracing::info!("Artifact hashes verified against {MANIFEST_FILE}");
    Ok(true)
}

/// Verify, then load the classifier and its feature schema.
///
/// # Errors
/// Returns the first verification or loading error.
pub fn load_artifacts(
    paths: &ArtifactPaths,
    positive_label: &str,
) -> Result<(LogisticClassifier, FeatureSchema), ModelError> {
    verify_artifacts(paths)?;
    let classifier = LogisticClassifier::load(&paths.model, positive_label)?;
    let schema = load_feature_schema(&paths.features)?;
    Ok((classifier, schema))
}
