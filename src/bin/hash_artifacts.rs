//! Integrity manifest utility for CardioRisk model artifacts.
//!
//! Writes `manifest.json` binding each artifact to its SHA-256 digest. When a
//! manifest is present next to the model, the application refuses to start
//! unless every bound file matches.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash_artifacts -- <model_dir> [--file <name>]...
//! ```
//!
//! Without `--file`, the default model and feature schema file names are
//! bound.

use std::env;
use std::fs;
use std::path::PathBuf;

use cardiorisk::adapters::artifacts::{ArtifactManifest, MANIFEST_FILE};

const DEFAULT_FILES: [&str; 2] = ["heart_disease_model.json", "model_features.json"];

fn usage() -> String {
    "Usage: hash_artifacts <model_dir> [--file <name>]...".to_string()
}

fn parse_args<I>(args: I) -> Result<(PathBuf, Vec<String>), String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut model_dir: Option<PathBuf> = None;
    let mut files: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => {
                let v = args.next().ok_or_else(usage)?;
                if v.contains('/') || v.contains('\\') || v == MANIFEST_FILE {
                    return Err(format!("--file must be a plain artifact name, got {v:?}"));
                }
                files.push(v);
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_none() {
                    model_dir = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    let model_dir = model_dir.ok_or_else(usage)?;
    if files.is_empty() {
        files = DEFAULT_FILES.iter().map(|s| s.to_string()).collect();
    }
    Ok((model_dir, files))
}

fn main() -> Result<(), String> {
    let (model_dir, files) = parse_args(env::args().skip(1))?;

    let model_dir = if model_dir.is_file() {
        model_dir
            .parent()
            .ok_or_else(|| "Model path has no parent directory".to_string())?
            .to_path_buf()
    } else {
        model_dir
    };

    let manifest = ArtifactManifest::for_files(&model_dir, &files).map_err(|e| e.to_string())?;
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize {MANIFEST_FILE}: {e}"))?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .map_err(|e| format!("Failed to write {manifest_path:?}: {e}"))?;

    // Read back what was written
    let required: Vec<&str> = files.iter().map(String::as_str).collect();
    ArtifactManifest::read_from(&model_dir)
        .and_then(|m| {
            m.ok_or_else(|| {
                cardiorisk::domain::ModelError::Integrity(format!("{MANIFEST_FILE} missing"))
            })
        })
        .and_then(|m| m.verify(&model_dir, &required))
        .map_err(|e| format!("Manifest self-check failed: {e}"))?;

    println!("Wrote manifest: {manifest_path:?}");
    for (name, digest) in &manifest.files {
        println!("  {name}  sha256={digest}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_bind_model_and_schema() {
        let (dir, files) = parse_args(args(&["models"])).expect("Should parse");
        assert_eq!(dir, PathBuf::from("models"));
        assert_eq!(files, DEFAULT_FILES.to_vec());
    }

    #[test]
    fn test_explicit_files() {
        let (_, files) = parse_args(args(&["models", "--file", "a.json", "--file", "b.json"]))
            .expect("Should parse");
        assert_eq!(files, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_rejects_paths_and_manifest_name() {
        for bad in ["../secret.json", "sub/model.json", "sub\\model.json", MANIFEST_FILE] {
            let err = parse_args(args(&["models", "--file", bad])).expect_err("must fail");
            assert!(err.contains("plain artifact name"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["models", "--file"])).is_err());
        assert!(parse_args(args(&["models", "other"])).is_err());
        assert!(parse_args(args(&["--help"])).is_err());
    }
}
